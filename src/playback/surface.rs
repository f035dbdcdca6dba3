use super::types::PlaybackMode;
use super::volume::VolumeIcon;

/// What a control surface needs to redraw itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub playing: bool,
    pub volume: f32,
    pub volume_icon: VolumeIcon,
    /// Logical position, seconds.
    pub position: f64,
    pub duration: f64,
    /// `position / duration` in `[0, 1]`.
    pub progress: f64,
    pub current_time_text: String,
    pub duration_text: String,
    pub transcoding_active: bool,
    pub mode: PlaybackMode,
}

impl SurfaceState {
    pub(crate) fn progress_of(position: f64, duration: f64) -> f64 {
        if duration > 0.0 {
            (position / duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// `h:mm:ss` from one hour up, `m:ss` below.
pub fn duration_to_string(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_hours() {
        assert_eq!(duration_to_string(0.0), "0:00");
        assert_eq!(duration_to_string(59.9), "0:59");
        assert_eq!(duration_to_string(61.0), "1:01");
        assert_eq!(duration_to_string(3600.0), "1:00:00");
        assert_eq!(duration_to_string(3723.4), "1:02:03");
        assert_eq!(duration_to_string(f64::NAN), "0:00");
    }

    #[test]
    fn progress_is_bounded() {
        assert_eq!(SurfaceState::progress_of(30.0, 120.0), 0.25);
        assert_eq!(SurfaceState::progress_of(130.0, 120.0), 1.0);
        assert_eq!(SurfaceState::progress_of(5.0, 0.0), 0.0);
    }
}
