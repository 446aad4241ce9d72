use std::borrow::Cow;

use effects::EffectKind;
use wgpu::naga::ShaderStage;

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    })
}

/// Compiles the fragment stage for `kind`, wrapped in the shared prelude.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device, kind: EffectKind) -> wgpu::ShaderModule {
    let source = fragment_source(kind);
    tracing::trace!(effect = %kind, bytes = source.len(), "compiling fragment shader");
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{kind} fragment")),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(source),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    })
}

/// Produces a self-contained GLSL fragment shader for one effect.
///
/// [`HEADER`] declares the uniform block and texture bindings, the effect body
/// defines `vec4 effect(vec2 uv)`, and [`FOOTER`] applies the host saturation
/// before writing `outColor`.
pub(crate) fn fragment_source(kind: EffectKind) -> String {
    let body = match kind {
        EffectKind::Ripple => RIPPLE_GLSL,
        EffectKind::Glitch => GLITCH_GLSL,
        EffectKind::Wavy => WAVY_GLSL,
    };
    format!("{HEADER}\n#line 1\n{body}\n{FOOTER}")
}

/// GLSL prologue shared by every effect.
///
/// The uniform block layout must match `EffectUniforms` in `gpu/uniforms.rs`.
const HEADER: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform EffectParams {
    vec2 pointer;
    vec2 previous_pointer;
    float intensity;
    float time;
    float saturation;
    float _padding0;
    vec4 shape;
} ubo;

layout(set = 1, binding = 0) uniform texture2D warpfx_texture;
layout(set = 1, binding = 1) uniform sampler warpfx_sampler;

vec4 sampleImage(vec2 uv) {
    return texture(sampler2D(warpfx_texture, warpfx_sampler), uv);
}
";

/// Saturation matrix luma weights match `effects::cpu::SATURATION_LUMA`.
const FOOTER: &str = r"void main() {
    vec4 color = effect(v_uv);
    float luma = dot(color.rgb, vec3(0.213, 0.715, 0.072));
    outColor = vec4(mix(vec3(luma), color.rgb, ubo.saturation), 1.0);
}
";

const RIPPLE_GLSL: &str = r"vec4 effect(vec2 uv) {
    float grid = ubo.shape.x;
    vec2 cell = floor(uv * grid) / grid + vec2(1.0 / grid);
    // Falloff written as 1 - smoothstep to keep edge0 < edge1.
    float strength = 1.0 - smoothstep(0.0, ubo.shape.y, length(cell - ubo.pointer));
    vec2 motion = ubo.pointer - ubo.previous_pointer;
    vec2 displaced = uv + strength * motion * ubo.shape.z;
    float split = strength * ubo.intensity * ubo.shape.w;
    vec4 base = sampleImage(displaced);
    float r = sampleImage(displaced + vec2(split, 0.0)).r;
    float b = sampleImage(displaced - vec2(split, 0.0)).b;
    return vec4(r, base.g, b, base.a);
}
";

const GLITCH_GLSL: &str = r"vec4 effect(vec2 uv) {
    vec4 base = sampleImage(uv);
    if (ubo.intensity <= 0.0) {
        return base;
    }
    float band = floor(uv.y * ubo.shape.x);
    float noise = fract(sin(band * 12345.6789 + ubo.intensity) * 43758.5453);
    vec2 offset = vec2(noise * ubo.shape.y * ubo.intensity, 0.0);
    vec4 forward = sampleImage(uv + offset);
    vec4 back = sampleImage(uv - offset);
    float slot = mod(band, 3.0);
    if (slot < 0.5) {
        return vec4(forward.r, back.g, base.b, 1.0);
    } else if (slot < 1.5) {
        return vec4(base.r, back.g, base.b, 1.0);
    }
    return vec4(forward.r, base.g, base.b, 1.0);
}
";

const WAVY_GLSL: &str = r"vec4 effect(vec2 uv) {
    vec2 m = ubo.pointer;
    float t = ubo.time;
    float w1 = sin(uv.x * 10.0 + t * 0.5 + m.x * 5.0) * ubo.intensity;
    float w2 = sin(uv.y * 12.0 + t * 0.8 + m.y * 4.0) * ubo.intensity;
    float w3 = cos(uv.x * 8.0 + t * 0.5 + m.x * 3.0) * ubo.intensity;
    float w4 = cos(uv.y * 9.0 + t * 0.7 + m.y * 3.5) * ubo.intensity;
    return sampleImage(vec2(uv.x + w3 + w4, uv.y + w1 + w2));
}
";

/// Minimal full-screen triangle vertex shader; `v_uv` has a bottom-left origin.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::naga::front::glsl::{Frontend, Options};
    use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};

    fn parse_and_validate(source: &str, stage: ShaderStage) -> Result<(), String> {
        let module = Frontend::default()
            .parse(&Options::from(stage), source)
            .map_err(|err| format!("{err:?}"))?;
        Validator::new(ValidationFlags::all(), Capabilities::all())
            .validate(&module)
            .map_err(|err| format!("{err:?}"))?;
        Ok(())
    }

    #[test]
    fn vertex_shader_parses_and_validates() {
        parse_and_validate(VERTEX_SHADER_GLSL, ShaderStage::Vertex).unwrap();
    }

    #[test]
    fn every_fragment_shader_parses_and_validates() {
        for kind in EffectKind::ALL {
            if let Err(err) = parse_and_validate(&fragment_source(kind), ShaderStage::Fragment) {
                panic!("{kind} fragment shader rejected: {err}");
            }
        }
    }

    #[test]
    fn every_effect_gets_prelude_and_footer() {
        for kind in EffectKind::ALL {
            let source = fragment_source(kind);
            assert!(source.starts_with("#version 450"), "{kind}");
            assert_eq!(source.matches("#version").count(), 1);
            assert!(source.contains("vec4 effect(vec2 uv)"));
            assert!(source.contains("ubo.saturation"));
            assert!(source.contains("void main()"));
        }
    }

    #[test]
    fn uniform_block_declares_fields_in_upload_order() {
        let order = [
            "vec2 pointer;",
            "vec2 previous_pointer;",
            "float intensity;",
            "float time;",
            "float saturation;",
            "vec4 shape;",
        ];
        let positions: Vec<_> = order
            .iter()
            .map(|field| HEADER.find(field).expect(field))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
