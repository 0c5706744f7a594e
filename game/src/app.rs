use std::time::Duration;

use engine::app::{AppContext, GameApp, InputFrame};
use engine::graphics::Renderer2d;
use engine::surface::SurfaceSize;

use crate::camera::Camera;
use crate::config::PuzzleConfig;
use crate::error::ConfigError;
use crate::input_adapter::{FrameAction, PointerTracker, actions_from_frame};
use crate::render::{camera_for_session, draw_session};
use crate::session::PuzzleSession;
use crate::sfx::{AudioSink, SoundCue, cue_for_event};

pub struct JigsawState {
    pub session: PuzzleSession,
    pub camera: Camera,
}

/// The windowed game: session plus pointer mapping, rendering and sound.
pub struct JigsawApp {
    config: PuzzleConfig,
    audio: Box<dyn AudioSink>,
    tracker: PointerTracker,
}

impl JigsawApp {
    pub fn new(config: PuzzleConfig, audio: Box<dyn AudioSink>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            audio,
            tracker: PointerTracker::default(),
        })
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    /// A freshly generated puzzle framed for `viewport`.
    pub fn new_state(&self, viewport: SurfaceSize) -> Result<JigsawState, ConfigError> {
        let mut session = PuzzleSession::new().with_image_source(self.config.image.build());
        session.generate(&self.config)?;
        let camera = camera_for_session(&session, viewport);
        Ok(JigsawState { session, camera })
    }

    /// One frame without a window: keys, pointer, clock, then the cues to play.
    pub fn step_frame(
        &mut self,
        state: &mut JigsawState,
        input: &InputFrame,
        dt: Duration,
        viewport: SurfaceSize,
    ) -> Vec<SoundCue> {
        for action in actions_from_frame(input) {
            match action {
                FrameAction::NewPuzzle => {
                    if let Err(err) = state.session.restart() {
                        tracing::warn!("new puzzle failed: {err}");
                    }
                }
            }
        }

        state.camera = camera_for_session(&state.session, viewport);
        let pointer = self.tracker.pointer_from_frame(input, &state.camera);
        state.session.handle_pointer(pointer);
        state.session.tick(dt);

        state
            .session
            .drain_events()
            .iter()
            .filter_map(cue_for_event)
            .collect()
    }
}

impl GameApp for JigsawApp {
    type State = JigsawState;
    type Effect = SoundCue;

    fn init_state(&mut self, ctx: &mut AppContext) -> Self::State {
        match self.new_state(ctx.surface_size) {
            Ok(state) => state,
            Err(err) => {
                // `new` validated the config, so only the image source can get here.
                tracing::error!("puzzle generation failed: {err}");
                let session = PuzzleSession::new();
                let camera = camera_for_session(&session, ctx.surface_size);
                JigsawState { session, camera }
            }
        }
    }

    fn update_state(
        &mut self,
        state: &mut Self::State,
        input: &InputFrame,
        dt: Duration,
        ctx: &mut AppContext,
    ) -> Vec<Self::Effect> {
        self.step_frame(state, input, dt, ctx.surface_size)
    }

    fn render(&mut self, state: &Self::State, renderer: &mut dyn Renderer2d) {
        draw_session(renderer, &state.session, &state.camera);
    }

    fn handle_effects(&mut self, effects: Vec<Self::Effect>, _ctx: &mut AppContext) {
        for cue in effects {
            self.audio.play_once(cue);
        }
    }
}
