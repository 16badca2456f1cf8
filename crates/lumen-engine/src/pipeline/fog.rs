use std::collections::HashMap;

use crate::device::FogParams;

/// Uniform sink handed to setters while a shader is being prepared.
pub trait ShaderServices {
    /// Fog state of the driver the shader renders with.
    fn fog(&self) -> FogParams;

    fn set_float(&mut self, name: &str, values: &[f32]);
}

/// Writes a group of uniforms for one shader.
pub trait ShaderUniformSetter {
    fn on_set_uniforms(&mut self, services: &mut dyn ShaderServices);
}

/// Creates uniform setters for shaders by name. `None` means the shader does
/// not use this group of uniforms.
pub trait ShaderUniformSetterFactory {
    fn create(&self, shader_name: &str) -> Option<Box<dyn ShaderUniformSetter>>;
}

/// Values written by [`FogShaderUniformSetter`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FogUniforms {
    /// Normalized RGBA.
    pub color: [f32; 4],
    pub distance: f32,
    pub shading_parameter: f32,
}

impl FogUniforms {
    pub fn from_params(fog: &FogParams) -> Self {
        Self {
            color: fog.color.to_f32(),
            distance: fog.end,
            shading_parameter: fog.shading_parameter(),
        }
    }
}

/// Sets `fogColor`, `fogDistance` and `fogShadingParameter`.
#[derive(Debug, Default)]
pub struct FogShaderUniformSetter;

impl ShaderUniformSetter for FogShaderUniformSetter {
    fn on_set_uniforms(&mut self, services: &mut dyn ShaderServices) {
        let u = FogUniforms::from_params(&services.fog());
        services.set_float("fogColor", &u.color);
        services.set_float("fogDistance", &[u.distance]);
        services.set_float("fogShadingParameter", &[u.shading_parameter]);
    }
}

/// Every shader gets fog uniforms.
#[derive(Debug, Default)]
pub struct FogShaderUniformSetterFactory;

impl ShaderUniformSetterFactory for FogShaderUniformSetterFactory {
    fn create(&self, _shader_name: &str) -> Option<Box<dyn ShaderUniformSetter>> {
        Some(Box::new(FogShaderUniformSetter))
    }
}

/// Plain uniform table implementing [`ShaderServices`].
#[derive(Debug, Clone)]
pub struct UniformValues {
    fog: FogParams,
    values: HashMap<String, Vec<f32>>,
}

impl UniformValues {
    pub fn new(fog: FogParams) -> Self {
        Self {
            fog,
            values: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.values.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ShaderServices for UniformValues {
    fn fog(&self) -> FogParams {
        self.fog
    }

    fn set_float(&mut self, name: &str, values: &[f32]) {
        self.values.insert(name.to_string(), values.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::FOG_RANGE_ALL;
    use crate::paint::Color;

    #[test]
    fn factory_covers_every_shader() {
        let factory = FogShaderUniformSetterFactory;
        assert!(factory.create("nodes_shader").is_some());
        assert!(factory.create("").is_some());
    }

    #[test]
    fn setter_writes_fog_uniforms() {
        let fog = FogParams::linear(Color::new(255, 255, 0, 51), 40.0, 80.0);
        let mut services = UniformValues::new(fog);

        let mut setter = FogShaderUniformSetterFactory.create("sky").unwrap();
        setter.on_set_uniforms(&mut services);

        assert_eq!(services.len(), 3);
        assert_eq!(services.get("fogColor"), Some(&[1.0, 0.0, 0.2, 1.0][..]));
        assert_eq!(services.get("fogDistance"), Some(&[80.0][..]));
        let shading = services.get("fogShadingParameter").unwrap()[0];
        assert!((shading - 2.0).abs() < 1e-6);
    }

    #[test]
    fn disabled_fog_reports_full_range() {
        let u = FogUniforms::from_params(&FogParams::default());
        assert_eq!(u.distance, FOG_RANGE_ALL);
        assert!((u.shading_parameter - 1.0).abs() < 1e-6);
    }
}
