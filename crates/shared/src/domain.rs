use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(SessionId);
id_newtype!(SymbolId);

/// Symbol id of the marker that drives navigation unless configured otherwise.
pub const DEFAULT_RECOGNIZED_SYMBOL: SymbolId = SymbolId(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationState {
    #[default]
    Idle,
    CarMenu,
    OptionsMenu,
    Carousel,
    VideoPlayback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuOption {
    View360,
    ShowVideo,
}

impl MenuOption {
    pub const ALL: [MenuOption; 2] = [MenuOption::View360, MenuOption::ShowVideo];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::View360 => "360 View",
            Self::ShowVideo => "Show Video",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedMarker {
    pub session_id: SessionId,
    pub symbol_id: SymbolId,
    /// Signed radians in (-pi, pi].
    pub angle: f64,
}
