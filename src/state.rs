//! Typed UI state.
//!
//! Inputs never write scene fields themselves. DOM listeners and keyboard
//! bindings produce a [`UiInput`], the app folds it into [`SceneSettings`] and
//! then copies the settings onto the camera, the light and the cube.

/// Which of the two configured textures the cube shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    #[default]
    Primary,
    Secondary,
}

impl TextureSlot {
    pub fn toggled(self) -> Self {
        match self {
            TextureSlot::Primary => TextureSlot::Secondary,
            TextureSlot::Secondary => TextureSlot::Primary,
        }
    }

    pub fn index(self) -> usize {
        match self {
            TextureSlot::Primary => 0,
            TextureSlot::Secondary => 1,
        }
    }

    /// Asset path of this slot among the two configured textures.
    pub fn path(self, textures: &[String; 2]) -> &str {
        &textures[self.index()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UiInput {
    /// New z position of the camera.
    CameraDistance(f32),
    ToggleTexture,
    /// New intensity of the directional light.
    LightIntensity(f32),
}

impl UiInput {
    /// Builds a slider input from the raw string value of an `<input type="range">`.
    pub fn parse_slider(value: &str, make: fn(f32) -> UiInput) -> anyhow::Result<UiInput> {
        let parsed: f32 = value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("slider value {value:?} is not a number: {e}"))?;
        anyhow::ensure!(parsed.is_finite(), "slider value {value:?} is not finite");
        Ok(make(parsed))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneSettings {
    pub camera_distance: f32,
    pub light_intensity: f32,
    pub texture: TextureSlot,
}

impl SceneSettings {
    pub fn apply(&mut self, input: UiInput) {
        match input {
            UiInput::CameraDistance(distance) => self.camera_distance = distance,
            UiInput::ToggleTexture => self.texture = self.texture.toggled(),
            UiInput::LightIntensity(intensity) => self.light_intensity = intensity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_values_are_parsed() {
        let input = UiInput::parse_slider(" 7.5 ", UiInput::CameraDistance).unwrap();
        assert_eq!(input, UiInput::CameraDistance(7.5));
    }

    #[test]
    fn garbage_slider_values_are_rejected() {
        assert!(UiInput::parse_slider("far", UiInput::LightIntensity).is_err());
        assert!(UiInput::parse_slider("inf", UiInput::LightIntensity).is_err());
    }

    #[test]
    fn texture_toggle_flips_back() {
        let textures = ["4.png".to_string(), "5.png".to_string()];
        let slot = TextureSlot::default();
        assert_eq!(slot.path(&textures), "4.png");
        assert_eq!(slot.toggled().path(&textures), "5.png");
        assert_eq!(slot.toggled().toggled(), slot);
    }
}
