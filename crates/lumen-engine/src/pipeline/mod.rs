//! Rendering cores and the collaborators they draw with.
//!
//! A core decides how the screen is split into views and in which order the
//! client world, wield tool, crosshair and HUD are drawn. The engine owns at
//! most one core at a time.

mod collab;
mod core;
mod fog;

pub use self::core::{create_core, PlainCore, RenderingCore, ScreenLayout, StereoCore, ThreeDMode};
pub use collab::{Client, Eye, Hud, SceneParams, ShadowRenderer, SharedShadowRenderer, View};
pub use fog::{
    FogShaderUniformSetter, FogShaderUniformSetterFactory, FogUniforms, ShaderServices,
    ShaderUniformSetter, ShaderUniformSetterFactory, UniformValues,
};
