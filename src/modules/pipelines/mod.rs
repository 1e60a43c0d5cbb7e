pub mod render_pipeline;
pub mod shadow_pipeline;
