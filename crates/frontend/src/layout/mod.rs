pub mod vertical_layout;

pub use vertical_layout::{active_icon, LayoutIcon, VerticalLayout};
