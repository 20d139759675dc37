use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlagAction {
    None,      // "-" (Not affected)
    Set,       // "1" (Always set)
    Reset,     // "0" (Always reset)
    Calculate, // "Z", "N", "H", or "C" (Computed at runtime)
    Invert,    // CCF only
}

impl FlagAction {
    /// Resolves the new state of a single flag.
    pub fn apply(self, current: bool, proposed: bool) -> bool {
        match self {
            FlagAction::None => current,
            FlagAction::Set => true,
            FlagAction::Reset => false,
            FlagAction::Calculate => proposed,
            FlagAction::Invert => !current,
        }
    }
}

impl fmt::Display for FlagAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = match self {
            FlagAction::None => '-',
            FlagAction::Calculate => 'v',
            FlagAction::Set => '1',
            FlagAction::Reset => '0',
            FlagAction::Invert => '!',
        };
        write!(f, "{}", c)
    }
}
