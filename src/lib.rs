pub mod font;
pub mod gradient;
pub mod icon_gen;
pub mod manifest;
