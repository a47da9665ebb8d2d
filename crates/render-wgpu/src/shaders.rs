/// Shared per-frame uniform block. Must match `FrameUniforms` in gpu.rs.
const FRAME_UNIFORMS: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    ambient: vec4<f32>,
    light_color: vec4<f32>,
    light_dir: vec4<f32>,
    // rgb fog color, a density
    fog: vec4<f32>,
    top_color: vec4<f32>,
    bottom_color: vec4<f32>,
    // xyz sun position in screen space, w elapsed seconds
    sun: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;
"#;

/// Full-screen water gradient with a sun glow and moving caustic shimmer.
const BACKGROUND_BODY: &str = r#"
struct BackgroundOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_background(@builtin(vertex_index) index: u32) -> BackgroundOutput {
    // One oversized triangle covering the viewport.
    let x = f32((index << 1u) & 2u);
    let y = f32(index & 2u);
    var out: BackgroundOutput;
    out.clip_position = vec4<f32>(x * 2.0 - 1.0, y * 2.0 - 1.0, 1.0, 1.0);
    out.uv = vec2<f32>(x, y);
    return out;
}

@fragment
fn fs_background(in: BackgroundOutput) -> @location(0) vec4<f32> {
    let time = frame.sun.w;
    var color = mix(frame.bottom_color.rgb, frame.top_color.rgb, clamp(in.uv.y, 0.0, 1.0));

    let sun_uv = vec2<f32>(frame.sun.x, frame.sun.y);
    let glow = pow(max(1.0 - distance(in.uv, sun_uv), 0.0), 6.0);
    color += vec3<f32>(0.4, 0.6, 0.7) * glow;

    let shimmer = sin(in.uv.x * 40.0 + time * 1.5) * sin(in.uv.y * 30.0 - time * 1.1);
    color += vec3<f32>(0.02, 0.04, 0.05) * shimmer * in.uv.y;

    return vec4<f32>(color, 1.0);
}
"#;

/// Instanced textured models with directional light, fog and swim sway.
const MODEL_BODY: &str = r#"
@group(1) @binding(0)
var diffuse_texture: texture_2d<f32>;
@group(1) @binding(1)
var diffuse_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) tex_coord: vec2<f32>,
    @location(3) mesh_id: u32,
};

struct InstanceInput {
    @location(4) model_0: vec4<f32>,
    @location(5) model_1: vec4<f32>,
    @location(6) model_2: vec4<f32>,
    @location(7) model_3: vec4<f32>,
    // x sway multiplier, y 1.0 when only tail submeshes sway
    @location(8) params: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) tex_coord: vec2<f32>,
};

@vertex
fn vs_model(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );

    var local = vertex.position;
    let sway = instance.params.x;
    if (sway > 0.0) {
        var amount = 1.0;
        if (instance.params.y > 0.5 && vertex.mesh_id == 0u) {
            amount = 0.0;
        }
        let phase = frame.sun.w * 2.0 * sway + local.x * 0.3;
        local.z += sin(phase) * 0.02 * abs(local.x) * amount;
    }

    let world_pos = model * vec4<f32>(local, 1.0);
    var out: VertexOutput;
    out.clip_position = frame.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.tex_coord = vec2<f32>(vertex.tex_coord.x, 1.0 - vertex.tex_coord.y);
    return out;
}

@fragment
fn fs_model(in: VertexOutput) -> @location(0) vec4<f32> {
    let albedo = textureSample(diffuse_texture, diffuse_sampler, in.tex_coord);

    // Models without normals get a flat up-facing normal.
    let normal_len = length(in.world_normal);
    let normal = select(vec3<f32>(0.0, 1.0, 0.0), in.world_normal / normal_len, normal_len > 1e-6);
    let to_light = normalize(-frame.light_dir.xyz);
    let diffuse = max(dot(normal, to_light), 0.0);
    let lit = albedo.rgb * (frame.ambient.rgb + frame.light_color.rgb * diffuse);

    let view_distance = length(frame.camera_pos.xyz - in.world_pos);
    let visibility = clamp(exp(-view_distance * frame.fog.a), 0.0, 1.0);
    let color = mix(frame.fog.rgb, lit, visibility);

    return vec4<f32>(color, albedo.a);
}
"#;

pub fn background_shader() -> String {
    format!("{FRAME_UNIFORMS}{BACKGROUND_BODY}")
}

pub fn model_shader() -> String {
    format!("{FRAME_UNIFORMS}{MODEL_BODY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaders_share_frame_block() {
        for source in [background_shader(), model_shader()] {
            assert!(source.contains("var<uniform> frame: Frame;"));
        }
    }

    #[test]
    fn entry_points_present() {
        let model = model_shader();
        assert!(model.contains("fn vs_model"));
        assert!(model.contains("fn fs_model"));
        let background = background_shader();
        assert!(background.contains("fn vs_background"));
        assert!(background.contains("fn fs_background"));
    }
}
