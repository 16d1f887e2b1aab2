//! Canned style presets
//!
//! Each preset is a text fragment appended to the user prompt to bias output
//! toward a named aesthetic. The `none` preset carries an empty modifier.

/// A named style with the prompt fragment that realizes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePreset {
    pub id: &'static str,
    pub label: &'static str,
    pub prompt_modifier: &'static str,
}

pub const STYLE_PRESETS: [StylePreset; 7] = [
    StylePreset {
        id: "none",
        label: "No Style (Default)",
        prompt_modifier: "",
    },
    StylePreset {
        id: "photorealistic",
        label: "Photorealistic",
        prompt_modifier:
            "photorealistic, 8k resolution, highly detailed, cinematic lighting, photography",
    },
    StylePreset {
        id: "anime",
        label: "Anime / Manga",
        prompt_modifier: "anime style, studio ghibli style, vibrantly colored, detailed shading",
    },
    StylePreset {
        id: "3d-render",
        label: "3D Render",
        prompt_modifier:
            "3d render, unreal engine 5, octane render, ray tracing, cute, smooth textures",
    },
    StylePreset {
        id: "cyberpunk",
        label: "Cyberpunk",
        prompt_modifier: "cyberpunk style, neon lights, futuristic, high tech, dark atmosphere",
    },
    StylePreset {
        id: "oil-painting",
        label: "Oil Painting",
        prompt_modifier: "oil painting, textured, classic art style, visible brushstrokes",
    },
    StylePreset {
        id: "vector",
        label: "Vector",
        prompt_modifier: "vector art, flat design, clean lines, minimalist, illustrator",
    },
];

/// Look up a preset by its id.
pub fn find_preset(id: &str) -> Option<&'static StylePreset> {
    STYLE_PRESETS.iter().find(|preset| preset.id == id)
}
