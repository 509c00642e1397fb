//! Headless tick driver: replays a pointer path against a [`Session`] on a
//! fixed frame cadence and feeds every frame to the attached renderers.

use crate::error::CliError;
use crate::pointer::PointerPath;
use serde_json::{json, Value};
use std::io::Write;
use vector_field_core::{
    Frame, FrameInputs, Renderer, Seed, Session, SimError, Simulation, TickClock,
};

/// Writes one JSON object per frame, newline-delimited.
pub struct JsonLinesRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn finish(mut self) -> Result<W, SimError> {
        self.out
            .flush()
            .map_err(|e| SimError::Render(e.to_string()))?;
        Ok(self.out)
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), SimError> {
        serde_json::to_writer(&mut self.out, frame).map_err(|e| SimError::Render(e.to_string()))?;
        self.out
            .write_all(b"\n")
            .map_err(|e| SimError::Render(e.to_string()))
    }
}

/// Aggregate statistics over a run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub anchors: usize,
    pub peak_particles: usize,
    pub final_particles: usize,
    pub final_visible_vectors: usize,
}

impl RunSummary {
    pub fn to_json(&self) -> Value {
        json!({
            "ticks": self.ticks,
            "anchors": self.anchors,
            "peak_particles": self.peak_particles,
            "final_particles": self.final_particles,
            "final_visible_vectors": self.final_visible_vectors,
        })
    }
}

impl Renderer for RunSummary {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), SimError> {
        self.ticks = frame.tick;
        self.peak_particles = self.peak_particles.max(frame.particles.len());
        self.final_particles = frame.particles.len();
        self.final_visible_vectors = frame.visible_vectors();
        Ok(())
    }
}

/// Runs `seed.ticks` frames of `path` and returns the run statistics.
///
/// Timestamps advance by `seed.frame_ms` per frame, so the first tick sees a
/// zero delta and every later tick sees `frame_ms / 1000` seconds.
pub fn simulate(
    seed: &Seed,
    path: PointerPath,
    mut output: Option<&mut dyn Renderer>,
) -> Result<RunSummary, CliError> {
    let mut session = Session::from_seed(seed)?;
    let mut clock = TickClock::new();
    let mut summary = RunSummary {
        anchors: session.grid().len(),
        ..RunSummary::default()
    };
    tracing::info!(
        width = seed.width,
        height = seed.height,
        ticks = seed.ticks,
        seed = seed.seed,
        ?path,
        "starting run"
    );

    for i in 0..seed.ticks {
        let dt = clock.sample(i as f64 * seed.frame_ms);
        let pointer = path.position(i, seed.ticks, seed.width, seed.height);
        session.tick(&FrameInputs::from_pointer(pointer, dt));

        let frame = session.frame();
        summary.render(&frame)?;
        if let Some(out) = output.as_deref_mut() {
            out.render(&frame)?;
        }
    }

    tracing::info!(
        peak = summary.peak_particles,
        live = summary.final_particles,
        "run finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recipe(ticks: usize) -> Seed {
        let mut s = Seed::new(320.0, 240.0, 42);
        s.ticks = ticks;
        s.params = json!({
            "field": {"grid_spacing": 40.0},
            "particles": {"spawn_rate": 120.0}
        });
        s
    }

    #[test]
    fn summary_tracks_ticks_and_anchors() {
        let summary = simulate(&recipe(30), PointerPath::Orbit, None).unwrap();
        assert_eq!(summary.ticks, 30);
        assert_eq!(summary.anchors, 48);
        assert!(summary.peak_particles > 0);
        assert!(summary.final_particles <= summary.peak_particles);
    }

    #[test]
    fn absent_pointer_never_spawns() {
        let summary = simulate(&recipe(30), PointerPath::Absent, None).unwrap();
        assert_eq!(summary.peak_particles, 0);
        assert_eq!(summary.final_visible_vectors, 48);
    }

    #[test]
    fn json_lines_has_one_frame_per_tick() {
        let mut writer = JsonLinesRenderer::new(Vec::new());
        simulate(&recipe(12), PointerPath::Sweep, Some(&mut writer)).unwrap();
        let bytes = writer.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 12);
        for (i, line) in lines.iter().enumerate() {
            let frame: Value = serde_json::from_str(line).unwrap();
            assert_eq!(frame["tick"], (i + 1) as u64);
            assert_eq!(frame["vectors"].as_array().unwrap().len(), 48);
        }
    }

    #[test]
    fn same_recipe_same_frames() {
        let mut a = JsonLinesRenderer::new(Vec::new());
        let mut b = JsonLinesRenderer::new(Vec::new());
        simulate(&recipe(20), PointerPath::Orbit, Some(&mut a)).unwrap();
        simulate(&recipe(20), PointerPath::Orbit, Some(&mut b)).unwrap();
        assert_eq!(a.finish().unwrap(), b.finish().unwrap());
    }

    #[test]
    fn invalid_recipe_is_a_sim_error() {
        let mut bad = recipe(5);
        bad.width = 0.0;
        let err = simulate(&bad, PointerPath::Orbit, None).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }
}
