//! Procedural ring patterns
//!
//! A pattern is a parametric curve sampled once per ring. The generator runs
//! one pattern for a run of rings, then switches and re-rolls amplitude,
//! frequency and phase. On the hardest difficulty a second layer of themed
//! sections picks which patterns are eligible and scales speed, amplitude
//! and spawn interval.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{Difficulty, DifficultyParams};

/// Amplitude range before difficulty/section scaling (world units)
const AMPLITUDE_RANGE: (f32, f32) = (120.0, 360.0);
/// Radians advanced per ring
const FREQUENCY_RANGE: (f32, f32) = (0.35, 0.9);
/// Inner radius of a star as a fraction of its outer radius
const STAR_INNER_RATIO: f32 = 0.45;

/// Closed set of curve generators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternKind {
    SineHorizontal,
    SineVertical,
    SineDiagonal,
    Helix,
    Spiral,
    FigureEight,
    Line,
    Triangle,
    Square,
    Hexagon,
    Star,
    Random,
}

/// Randomized parameters for the current pattern run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternParams {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
    /// Line endpoints
    pub from: Vec2,
    pub to: Vec2,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            amplitude: AMPLITUDE_RANGE.0,
            frequency: FREQUENCY_RANGE.0,
            phase: 0.0,
            from: Vec2::ZERO,
            to: Vec2::ZERO,
        }
    }
}

impl PatternKind {
    pub const ALL: [PatternKind; 12] = [
        PatternKind::SineHorizontal,
        PatternKind::SineVertical,
        PatternKind::SineDiagonal,
        PatternKind::Helix,
        PatternKind::Spiral,
        PatternKind::FigureEight,
        PatternKind::Line,
        PatternKind::Triangle,
        PatternKind::Square,
        PatternKind::Hexagon,
        PatternKind::Star,
        PatternKind::Random,
    ];

    /// Ring count at which this pattern unlocks on Normal
    fn base_unlock(self) -> u32 {
        match self {
            PatternKind::SineHorizontal | PatternKind::Line => 0,
            PatternKind::SineVertical => 4,
            PatternKind::Helix => 8,
            PatternKind::SineDiagonal => 12,
            PatternKind::Square => 16,
            PatternKind::Triangle => 20,
            PatternKind::FigureEight => 26,
            PatternKind::Spiral => 32,
            PatternKind::Hexagon => 38,
            PatternKind::Star => 45,
            PatternKind::Random => 55,
        }
    }

    pub fn unlocked(self, ring_count: u32, params: &DifficultyParams) -> bool {
        let threshold = (self.base_unlock() as f32 * params.unlock_scale).round() as u32;
        ring_count >= threshold
    }

    /// Sample the curve for ring `step` of a run of `run_length` rings
    pub fn point(self, p: &PatternParams, step: u32, run_length: u32, rng: &mut Pcg32) -> Vec2 {
        let a = p.amplitude;
        let t = step as f32 * p.frequency + p.phase;
        match self {
            PatternKind::SineHorizontal => Vec2::new(a * t.sin(), 0.0),
            PatternKind::SineVertical => Vec2::new(0.0, a * t.sin()),
            PatternKind::SineDiagonal => Vec2::from_angle(p.phase) * (a * t.sin()),
            PatternKind::Helix => Vec2::from_angle(t) * a,
            PatternKind::Spiral => {
                let grow = (step + 1) as f32 / run_length.max(1) as f32;
                Vec2::from_angle(t) * (a * grow)
            }
            PatternKind::FigureEight => Vec2::new(a * t.sin(), a * t.sin() * t.cos()),
            PatternKind::Line => {
                let u = step as f32 / run_length.saturating_sub(1).max(1) as f32;
                p.from.lerp(p.to, u.min(1.0))
            }
            PatternKind::Triangle => polygon_point(3, a, p.phase, step),
            PatternKind::Square => polygon_point(4, a, p.phase, step),
            PatternKind::Hexagon => polygon_point(6, a, p.phase, step),
            PatternKind::Star => {
                let k = step % 10;
                let r = if k % 2 == 0 { a } else { a * STAR_INNER_RATIO };
                Vec2::from_angle(p.phase + TAU * k as f32 / 10.0) * r
            }
            PatternKind::Random => {
                let angle = rng.random_range(0.0..TAU);
                let r = a * rng.random::<f32>().sqrt();
                Vec2::from_angle(angle) * r
            }
        }
    }
}

/// Walk a regular polygon's perimeter, two rings per edge
fn polygon_point(sides: u32, radius: f32, phase: f32, step: u32) -> Vec2 {
    let u = step as f32 * 0.5;
    let edge = (u.floor() as u32) % sides;
    let frac = u.fract();
    let corner = |k: u32| Vec2::from_angle(phase + TAU * k as f32 / sides as f32) * radius;
    corner(edge).lerp(corner((edge + 1) % sides), frac)
}

/// Themed group of patterns used on the hardest difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionTheme {
    Waves,
    Geometry,
    Chaos,
    Breather,
}

/// Scaling applied on top of difficulty parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionMultipliers {
    pub speed: f32,
    pub amplitude: f32,
    pub spawn_interval: f32,
}

impl SectionMultipliers {
    pub const NEUTRAL: Self = Self {
        speed: 1.0,
        amplitude: 1.0,
        spawn_interval: 1.0,
    };
}

impl SectionTheme {
    pub const ALL: [SectionTheme; 4] = [
        SectionTheme::Waves,
        SectionTheme::Geometry,
        SectionTheme::Chaos,
        SectionTheme::Breather,
    ];

    pub fn patterns(self) -> &'static [PatternKind] {
        match self {
            SectionTheme::Waves => &[
                PatternKind::SineHorizontal,
                PatternKind::SineVertical,
                PatternKind::SineDiagonal,
                PatternKind::Helix,
            ],
            SectionTheme::Geometry => &[
                PatternKind::Triangle,
                PatternKind::Square,
                PatternKind::Hexagon,
                PatternKind::Star,
            ],
            SectionTheme::Chaos => &[
                PatternKind::Random,
                PatternKind::Spiral,
                PatternKind::FigureEight,
            ],
            SectionTheme::Breather => &[PatternKind::Line, PatternKind::Helix],
        }
    }

    pub fn multipliers(self) -> SectionMultipliers {
        match self {
            SectionTheme::Waves => SectionMultipliers {
                speed: 1.1,
                amplitude: 1.0,
                spawn_interval: 0.9,
            },
            SectionTheme::Geometry => SectionMultipliers {
                speed: 1.0,
                amplitude: 1.1,
                spawn_interval: 1.0,
            },
            SectionTheme::Chaos => SectionMultipliers {
                speed: 1.25,
                amplitude: 1.2,
                spawn_interval: 0.8,
            },
            SectionTheme::Breather => SectionMultipliers {
                speed: 0.85,
                amplitude: 0.7,
                spawn_interval: 1.15,
            },
        }
    }

    /// Inclusive range of rings per section
    fn length_range(self) -> (u32, u32) {
        match self {
            SectionTheme::Breather => (10, 14),
            _ => (20, 32),
        }
    }
}

/// Section sub-state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionState {
    pub theme: SectionTheme,
    /// Rings left in this section
    pub remaining: u32,
}

/// Result of sampling the generator for one ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternStep {
    pub point: Vec2,
    /// Set when this step switched pattern
    pub new_pattern: Option<PatternKind>,
    /// Set when this step entered a new section
    pub new_section: Option<SectionTheme>,
}

/// Pattern-selection sub-state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternGenerator {
    pub current: PatternKind,
    /// Rings emitted in the current run
    pub progress: u32,
    pub run_length: u32,
    pub params: PatternParams,
    pub section: Option<SectionState>,
}

impl Default for PatternGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternGenerator {
    pub fn new() -> Self {
        Self {
            current: PatternKind::SineHorizontal,
            progress: 0,
            // Forces a switch on the first sample
            run_length: 0,
            params: PatternParams::default(),
            section: None,
        }
    }

    /// Multipliers of the active section (neutral outside sections)
    pub fn multipliers(&self) -> SectionMultipliers {
        self.section
            .map(|s| s.theme.multipliers())
            .unwrap_or(SectionMultipliers::NEUTRAL)
    }

    /// Next spawn point (plane coordinates, centered on the origin)
    pub fn next_point(&mut self, ring_count: u32, difficulty: Difficulty, rng: &mut Pcg32) -> PatternStep {
        let params = difficulty.params();
        let mut new_section = None;
        let mut new_pattern = None;

        if params.sections {
            let exhausted = self.section.is_none_or(|s| s.remaining == 0);
            if exhausted {
                let theme = self.pick_section(rng);
                let (lo, hi) = theme.length_range();
                self.section = Some(SectionState {
                    theme,
                    remaining: rng.random_range(lo..=hi),
                });
                // New section always starts a fresh run
                self.progress = self.run_length;
                new_section = Some(theme);
                log::info!("Section -> {theme:?}");
            }
        } else {
            self.section = None;
        }

        if self.progress >= self.run_length {
            self.switch_pattern(ring_count, &params, rng);
            new_pattern = Some(self.current);
        }

        let point = self
            .current
            .point(&self.params, self.progress, self.run_length, rng);
        self.progress += 1;
        if let Some(section) = self.section.as_mut() {
            section.remaining = section.remaining.saturating_sub(1);
        }

        PatternStep {
            point,
            new_pattern,
            new_section,
        }
    }

    fn pick_section(&self, rng: &mut Pcg32) -> SectionTheme {
        let previous = self.section.map(|s| s.theme);
        let choices: Vec<SectionTheme> = SectionTheme::ALL
            .into_iter()
            .filter(|t| Some(*t) != previous)
            .collect();
        choices[rng.random_range(0..choices.len())]
    }

    fn switch_pattern(&mut self, ring_count: u32, params: &DifficultyParams, rng: &mut Pcg32) {
        let mut choices: Vec<PatternKind> = match self.section {
            Some(section) => section.theme.patterns().to_vec(),
            None => PatternKind::ALL
                .into_iter()
                .filter(|k| k.unlocked(ring_count, params))
                .collect(),
        };
        if choices.len() > 1 {
            choices.retain(|k| *k != self.current);
        }
        self.current = choices[rng.random_range(0..choices.len())];

        let (lo, hi) = params.run_length;
        let mut run = rng.random_range(lo..=hi);
        if let Some(section) = self.section {
            run = run.min(section.remaining.max(1));
        }
        self.run_length = run;
        self.progress = 0;

        let amplitude_scale = params.amplitude_scale * self.multipliers().amplitude;
        let amplitude = rng.random_range(AMPLITUDE_RANGE.0..AMPLITUDE_RANGE.1) * amplitude_scale;
        let from = Vec2::from_angle(rng.random_range(0.0..TAU)) * amplitude * rng.random::<f32>();
        let to = Vec2::from_angle(rng.random_range(0.0..TAU)) * amplitude * rng.random::<f32>();
        self.params = PatternParams {
            amplitude,
            frequency: rng.random_range(FREQUENCY_RANGE.0..FREQUENCY_RANGE.1),
            phase: rng.random_range(0.0..TAU),
            from,
            to,
        };
        log::debug!(
            "Pattern -> {:?} for {} rings (amp {:.0}, freq {:.2})",
            self.current,
            self.run_length,
            self.params.amplitude,
            self.params.frequency
        );
    }
}
