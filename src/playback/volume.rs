/// Default increment used by the volume keys.
pub const VOLUME_STEP: f32 = 0.05;

/// Tolerance for deciding a level already sits on the step grid.
const GRID_EPSILON: f32 = 1e-4;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VolumeIcon {
    Muted,
    Low,
    High,
}

/// User output level in `[0, 1]`, quantized stepping and mute memory.
///
/// Persisting and forwarding the level to the primitive is the engine's job.
#[derive(Debug, Clone)]
pub struct VolumeController {
    level: f32,
    pre_mute: Option<f32>,
    step: f32,
}

impl VolumeController {
    pub fn new(level: f32) -> Self {
        Self {
            level: clamp(level),
            pre_mute: None,
            step: VOLUME_STEP,
        }
    }

    pub fn with_step(mut self, step: f32) -> Self {
        if step > 0.0 && step <= 1.0 {
            self.step = step;
        }
        self
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Clamp and store `level`; returns the stored value.
    pub fn set(&mut self, level: f32) -> f32 {
        self.level = clamp(level);
        if self.level > 0.0 {
            self.pre_mute = None;
        }
        self.level
    }

    pub fn step_up(&mut self) -> f32 {
        let scaled = self.level / self.step;
        let target = if on_grid(scaled) {
            (scaled.round() + 1.0) * self.step
        } else {
            scaled.ceil() * self.step
        };
        self.set(target)
    }

    pub fn step_down(&mut self) -> f32 {
        let scaled = self.level / self.step;
        let target = if on_grid(scaled) {
            (scaled.round() - 1.0) * self.step
        } else {
            scaled.floor() * self.step
        };
        self.set(target)
    }

    /// Mute, or restore the level that was active before muting.
    pub fn toggle_mute(&mut self) -> f32 {
        match self.pre_mute.take() {
            Some(previous) if self.level == 0.0 => {
                self.level = previous;
            }
            _ if self.level > 0.0 => {
                self.pre_mute = Some(self.level);
                self.level = 0.0;
            }
            _ => {}
        }
        self.level
    }

    pub fn icon(&self) -> VolumeIcon {
        icon_for(self.level)
    }
}

impl Default for VolumeController {
    fn default() -> Self {
        Self::new(1.0)
    }
}

pub(crate) fn icon_for(level: f32) -> VolumeIcon {
    if level <= 0.0 {
        VolumeIcon::Muted
    } else if level <= 0.5 {
        VolumeIcon::Low
    } else {
        VolumeIcon::High
    }
}

fn clamp(level: f32) -> f32 {
    if level.is_nan() {
        return 0.0;
    }
    level.clamp(0.0, 1.0)
}

fn on_grid(scaled: f32) -> bool {
    (scaled - scaled.round()).abs() < GRID_EPSILON
}
