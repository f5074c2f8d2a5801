pub mod color;
pub mod license;
pub mod pattern;
pub mod reference;
pub mod theme;

pub use color::{Dimension, LengthError, LengthUnit, Oklch};
pub use license::LicenseState;
pub use pattern::{
    AdvancedPattern, Alignment, Breakpoint, CollapsibleConfig, Display, FlexDirection,
    LayoutProps, Orientation, PatternCategory, PatternKind, PatternToken, QueryMode,
    RegionPosition, ShellRegion, StickyConfig,
};
pub use reference::{RefParseError, Tier, TokenRef};
pub use theme::{
    BrandTone, ContrastPair, Lookup, SUPPORTED_SCHEMA_VERSION, Theme, ThemeSummary, TokenGroup,
    TokenNode, TokenTree, TokenValue,
};
