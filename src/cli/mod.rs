pub mod analyze_cmd;
pub mod output;
pub mod renderer;
