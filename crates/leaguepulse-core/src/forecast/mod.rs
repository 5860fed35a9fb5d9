// Power index and weekly matchup previews.

pub mod power;
pub mod preview;
