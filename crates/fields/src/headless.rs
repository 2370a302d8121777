//! Headless rendering: drives a [`Backdrop`] over a [`Pixmap`] with a
//! [`ManualHost`] standing in for the browser's frame clock.
//!
//! The full lifecycle runs exactly as it would on a page, including deferred
//! resizes, so a snapshot is what a viewer would have seen after the same
//! number of display refreshes.

use backdrop_core::{Backdrop, BackdropError, ManualHost, ParticleField, Pixmap, Scene, Size};
use tracing::{debug, info};

use crate::FieldKind;

/// A viewport change delivered just before frame `frame` (zero-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeEvent {
    pub frame: usize,
    pub size: Size,
}

/// Outcome of a headless run.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub pixmap: Pixmap,
    pub frames: u64,
    pub population: usize,
}

/// Renders `scene.frames` frames of the scene's field.
///
/// The pixmap background is the field's fade color made opaque, matching the
/// page behind a freshly sized canvas. Resize events are applied through the
/// same deferred path a browser resize takes.
pub fn render(scene: &Scene, resizes: &[ResizeEvent]) -> Result<Rendered, BackdropError> {
    scene.validate()?;
    for event in resizes {
        if event.size.width == 0 || event.size.height == 0 {
            return Err(BackdropError::InvalidDimensions);
        }
    }

    let field = FieldKind::from_name(&scene.field, scene.seed, &scene.params)?;
    let background = field.fade_color().with_alpha(1.0);
    let host = ManualHost::new(scene.size());
    let clock = host.clone();

    let mut backdrop = Backdrop::start(
        Pixmap::new(Size::default(), background),
        host,
        Box::new(field),
    )?;
    info!(
        field = %scene.field,
        width = scene.width,
        height = scene.height,
        seed = scene.seed,
        frames = scene.frames,
        "rendering scene"
    );

    for frame in 0..scene.frames {
        for event in resizes.iter().filter(|e| e.frame == frame) {
            clock.set_viewport(event.size);
            backdrop.on_resize();
        }
        if !clock.fire_frame() || !backdrop.frame() {
            debug!(frame, "frame loop ended early");
            break;
        }
    }

    let rendered = Rendered {
        pixmap: backdrop.surface().clone(),
        frames: backdrop.frames_rendered(),
        population: backdrop.field().population(),
    };
    backdrop.stop();
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::{Rgba, Surface};
    use serde_json::json;

    fn scene(field: &str, w: u32, h: u32, frames: usize) -> Scene {
        let mut s = Scene::new(field, w, h, 7);
        s.frames = frames;
        s
    }

    #[test]
    fn zero_frames_is_plain_background() {
        let out = render(&scene("circuit", 40, 30, 0), &[]).unwrap();
        assert_eq!(out.frames, 0);
        assert_eq!(out.pixmap.size(), Size::new(40, 30));
        assert_eq!(out.pixmap.pixel(10, 10), Some([2, 16, 39]));
    }

    #[test]
    fn renders_requested_frame_count() {
        let out = render(&scene("neural", 200, 120, 12), &[]).unwrap();
        assert_eq!(out.frames, 12);
        assert!(out.population >= 24);
    }

    #[test]
    fn neural_nodes_light_up_their_centers() {
        let out = render(&scene("neural", 1000, 600, 3), &[]).unwrap();
        let [r, g, b] = out.pixmap.pixel(200, 100).unwrap();
        assert!(g > 100 && b > 100, "node center too dark: {r},{g},{b}");
        assert!(r < g);
    }

    #[test]
    fn circuit_trails_brighten_the_background() {
        let mut s = scene("circuit", 400, 300, 60);
        s.params = json!({"density": 1000.0});
        let out = render(&s, &[]).unwrap();
        let bg = [2u8, 16, 39];
        let lit = (0..300)
            .flat_map(|y| (0..400).map(move |x| (x, y)))
            .filter(|&(x, y)| out.pixmap.pixel(x, y) != Some(bg))
            .count();
        assert!(lit > 100, "only {lit} pixels touched");
    }

    #[test]
    fn same_scene_same_pixels() {
        let a = render(&scene("circuit", 160, 120, 30), &[]).unwrap();
        let b = render(&scene("circuit", 160, 120, 30), &[]).unwrap();
        assert_eq!(a.pixmap.to_rgba8(), b.pixmap.to_rgba8());
    }

    #[test]
    fn resize_event_changes_output_size() {
        let event = ResizeEvent {
            frame: 5,
            size: Size::new(100, 80),
        };
        let out = render(&scene("circuit", 200, 160, 10), &[event]).unwrap();
        assert_eq!(out.pixmap.size(), Size::new(100, 80));
        assert_eq!(out.frames, 10);
    }

    #[test]
    fn resize_on_last_frame_index_is_applied() {
        let event = ResizeEvent {
            frame: 2,
            size: Size::new(50, 50),
        };
        let out = render(&scene("neural", 100, 100, 3), &[event]).unwrap();
        assert_eq!(out.pixmap.size(), Size::new(50, 50));
    }

    #[test]
    fn resize_past_the_end_is_never_delivered() {
        let event = ResizeEvent {
            frame: 3,
            size: Size::new(50, 50),
        };
        let out = render(&scene("neural", 100, 100, 3), &[event]).unwrap();
        assert_eq!(out.pixmap.size(), Size::new(100, 100));
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(matches!(
            render(&scene("plasma", 10, 10, 1), &[]),
            Err(BackdropError::UnknownField(_))
        ));
    }

    #[test]
    fn zero_sized_scene_or_resize_is_rejected() {
        assert!(matches!(
            render(&scene("circuit", 0, 10, 1), &[]),
            Err(BackdropError::InvalidDimensions)
        ));
        let event = ResizeEvent {
            frame: 0,
            size: Size::new(0, 10),
        };
        assert!(matches!(
            render(&scene("circuit", 10, 10, 1), &[event]),
            Err(BackdropError::InvalidDimensions)
        ));
    }

    #[test]
    fn background_follows_fade_color() {
        let mut s = scene("neural", 20, 20, 0);
        s.params = json!({"fade": "rgba(40, 0, 0, 0.3)"});
        let out = render(&s, &[]).unwrap();
        assert_eq!(out.pixmap.background(), Rgba::new(40, 0, 0, 1.0));
    }
}
