/// WGSL shader for lit, shadow-receiving mesh instances.
pub const SCENE_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    light_view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient: vec4<f32>,
    // xyz: unit vector towards the light, w: 1.0 when shadows are on
    sun_direction: vec4<f32>,
    sun_color: vec4<f32>,
    // x: shadow texel size in uv, y: depth bias,
    // z: 1.0 when the target has no hardware sRGB encoding
    shadow_params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;
@group(0) @binding(1)
var shadow_map: texture_depth_2d;
@group(0) @binding(2)
var shadow_sampler: sampler_comparison;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    // x: metalness, y: roughness, z: receives shadow
    @location(7) surface: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) surface: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = globals.view_proj * world_pos;
    out.world_position = world_pos.xyz;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    out.surface = instance.surface;
    return out;
}

fn shadow_factor(world_position: vec3<f32>) -> f32 {
    let clip = globals.light_view_proj * vec4<f32>(world_position, 1.0);
    let ndc = clip.xyz / clip.w;
    let uv = vec2<f32>(ndc.x * 0.5 + 0.5, -ndc.y * 0.5 + 0.5);
    if (uv.x < 0.0 || uv.x > 1.0 || uv.y < 0.0 || uv.y > 1.0 || ndc.z > 1.0) {
        return 1.0;
    }

    let texel = globals.shadow_params.x;
    let depth_ref = ndc.z - globals.shadow_params.y;
    var lit = 0.0;
    for (var y = -1; y <= 1; y = y + 1) {
        for (var x = -1; x <= 1; x = x + 1) {
            let offset = vec2<f32>(f32(x), f32(y)) * texel;
            lit = lit + textureSampleCompareLevel(shadow_map, shadow_sampler, uv + offset, depth_ref);
        }
    }
    return lit / 9.0;
}

fn linear_to_srgb(c: vec3<f32>) -> vec3<f32> {
    let low = c * 12.92;
    let high = 1.055 * pow(c, vec3<f32>(1.0 / 2.4)) - 0.055;
    return select(high, low, c <= vec3<f32>(0.0031308));
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let v = normalize(globals.camera_position.xyz - in.world_position);
    let l = globals.sun_direction.xyz;

    let base = in.color.rgb;
    let metalness = in.surface.x;
    let roughness = clamp(in.surface.y, 0.04, 1.0);
    let diffuse_color = base * (1.0 - metalness);
    let f0 = mix(vec3<f32>(0.04), base, metalness);

    var shadow = 1.0;
    if (globals.sun_direction.w > 0.5 && in.surface.z > 0.5) {
        shadow = shadow_factor(in.world_position);
    }

    // Blinn-Phong lobe with its exponent derived from roughness.
    let n_dot_l = max(dot(n, l), 0.0);
    let h = normalize(l + v);
    let n_dot_h = max(dot(n, h), 0.0);
    let alpha = roughness * roughness;
    let shininess = max(2.0 / (alpha * alpha) - 2.0, 1.0);
    let specular = f0 * pow(n_dot_h, shininess) * (shininess + 8.0) / 25.132741;

    let direct = (diffuse_color + specular) * globals.sun_color.rgb * n_dot_l * shadow;
    let ambient = globals.ambient.rgb * diffuse_color;
    var color = ambient + direct;
    if (globals.shadow_params.z > 0.5) {
        color = linear_to_srgb(clamp(color, vec3<f32>(0.0), vec3<f32>(1.0)));
    }
    return vec4<f32>(color, in.color.a);
}
"#;

/// Depth-only WGSL shader that renders shadow casters from the light.
pub const SHADOW_SHADER: &str = r#"
struct ShadowUniforms {
    light_view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> shadow: ShadowUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
};

@vertex
fn vs_shadow(vertex: VertexInput, instance: InstanceInput) -> @builtin(position) vec4<f32> {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    return shadow.light_view_proj * model * vec4<f32>(vertex.position, 1.0);
}
"#;
