//! Timed flights between stops.
//!
//! Each render surface puts a [`TransitionAnimator`] on its avatar. Every frame the
//! animator is shown the committed leg `(previous, current)` and the [`Flying`] view
//! flag, and it produces a [`TransitionFrame`] the surface draws from. The committed
//! location has already moved by the time a flight starts; landing only clears flags.

use std::f32::consts::PI;

use bevy::prelude::*;

use crate::locations::location;
use crate::progression::ProgressionState;

pub struct FlightPlugin;

impl Plugin for FlightPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Flying>()
            .add_message::<FlightLanded>()
            .add_systems(
                Update,
                (drive_animators, land_flights)
                    .chain()
                    .in_set(FlightSystems)
                    .run_if(resource_exists::<ProgressionState>),
            );
    }
}

/// Shell systems that commit run before this set, surfaces that draw run after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlightSystems;

/// View flag: true while the avatar is between stops. Not part of the committed state.
#[derive(Resource, Default, Debug)]
pub struct Flying(pub bool);

/// Written once per leg when an animator reaches the destination.
#[derive(Message, Debug, Clone, Copy)]
pub struct FlightLanded {
    pub leg: (usize, usize),
}

/// Duration and arc height of a flight on one surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightProfile {
    pub duration: f32,
    pub arc_height: f32,
}

/// Horizontal travel across the 2D map, arc in pixels.
pub const MAP_PROFILE: FlightProfile = FlightProfile {
    duration: 2.0,
    arc_height: 60.0,
};

/// Arcing flight over the 3D surface, arc in world units.
pub const GLOBE_PROFILE: FlightProfile = FlightProfile {
    duration: 3.5,
    arc_height: 25.0,
};

impl FlightProfile {
    pub fn raw_progress(&self, elapsed: f32) -> f32 {
        (elapsed / self.duration).clamp(0.0, 1.0)
    }
}

/// Cubic ease-in-out over `[0, 1]`.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Vertical lift of the flight path: zero at both ends, `height` at the midpoint.
pub fn arc_offset(eased: f32, height: f32) -> f32 {
    (eased * PI).sin() * height
}

pub fn map_position(start: Vec2, end: Vec2, eased: f32, arc_height: f32) -> Vec2 {
    start.lerp(end, eased) + Vec2::Y * arc_offset(eased, arc_height)
}

pub fn world_position(start: Vec3, end: Vec3, eased: f32, arc_height: f32) -> Vec3 {
    start.lerp(end, eased) + Vec3::Y * arc_offset(eased, arc_height)
}

/// Linear blend of two sRGB triples.
pub fn blend_rgb(from: [f32; 3], to: [f32; 3], t: f32) -> Color {
    let mix = |i: usize| from[i] + (to[i] - from[i]) * t;
    Color::srgb(mix(0), mix(1), mix(2))
}

/// One step of an exponential low-pass filter toward `target`.
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// [`approach`] for angles, taking the short way around.
pub fn approach_angle(current: f32, target: f32, factor: f32) -> f32 {
    let delta = (target - current + PI).rem_euclid(std::f32::consts::TAU) - PI;
    current + delta * factor
}

/// Yaw that faces along the horizontal part of `displacement`. Bevy looks down -Z.
pub fn facing_yaw(displacement: Vec3) -> Option<f32> {
    let flat = Vec2::new(displacement.x, displacement.z);
    if flat.length_squared() < 1e-4 {
        return None;
    }
    Some((-flat.x).atan2(-flat.y))
}

/// Camera rigidly attached to the avatar.
#[derive(Debug, Clone, Copy)]
pub struct CameraRig {
    pub offset: Vec3,
    pub look_offset: Vec3,
}

impl CameraRig {
    pub fn transform_for(&self, avatar: Vec3) -> Transform {
        Transform::from_translation(avatar + self.offset)
            .looking_at(avatar + self.look_offset, Vec3::Y)
    }
}

/// Snapshot of a flight at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionFrame {
    pub source: usize,
    pub dest: usize,
    pub raw_progress: f32,
    pub eased_progress: f32,
    pub elapsed_ms: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimatorPhase {
    Idle,
    Armed { start: f32 },
    Running { start: f32 },
    Completing,
}

#[derive(Component, Debug)]
pub struct TransitionAnimator {
    profile: FlightProfile,
    phase: AnimatorPhase,
    seen_leg: Option<(usize, usize)>,
}

impl TransitionAnimator {
    pub fn new(profile: FlightProfile) -> Self {
        Self {
            profile,
            phase: AnimatorPhase::Idle,
            seen_leg: None,
        }
    }

    pub fn profile(&self) -> FlightProfile {
        self.profile
    }

    pub fn phase(&self) -> AnimatorPhase {
        self.phase
    }

    /// Feeds the latest committed leg and view flag.
    ///
    /// A leg that differs from the last one seen always rebases the animator at `now`,
    /// even mid-flight, so a rapid double advance is never dropped. Clearing the flag
    /// while a flight is live cancels it outright.
    pub fn observe(&mut self, leg: (usize, usize), flying: bool, now: f32) {
        if self.seen_leg != Some(leg) {
            self.seen_leg = Some(leg);
            self.phase = if flying && leg.0 != leg.1 {
                AnimatorPhase::Armed { start: now }
            } else {
                AnimatorPhase::Idle
            };
            return;
        }

        if !flying
            && matches!(
                self.phase,
                AnimatorPhase::Armed { .. } | AnimatorPhase::Running { .. }
            )
        {
            self.phase = AnimatorPhase::Idle;
        }
    }

    /// Advances the state machine. Returns `true` exactly once per leg, on arrival.
    pub fn tick(&mut self, now: f32) -> bool {
        if let AnimatorPhase::Armed { start } = self.phase {
            self.phase = AnimatorPhase::Running { start };
        }

        match self.phase {
            AnimatorPhase::Running { start } if self.profile.raw_progress(now - start) >= 1.0 => {
                self.phase = AnimatorPhase::Completing;
                true
            }
            AnimatorPhase::Completing => {
                self.phase = AnimatorPhase::Idle;
                false
            }
            _ => false,
        }
    }

    /// `None` while idle; the avatar then rests at the current stop.
    pub fn sample(&self, now: f32) -> Option<TransitionFrame> {
        let (source, dest) = self.seen_leg?;
        let elapsed = match self.phase {
            AnimatorPhase::Idle => return None,
            AnimatorPhase::Armed { start } | AnimatorPhase::Running { start } => {
                (now - start).max(0.0)
            }
            AnimatorPhase::Completing => self.profile.duration,
        };
        let raw_progress = self.profile.raw_progress(elapsed);
        Some(TransitionFrame {
            source,
            dest,
            raw_progress,
            eased_progress: ease_in_out_cubic(raw_progress),
            elapsed_ms: elapsed * 1000.0,
        })
    }
}

fn drive_animators(
    time: Res<Time>,
    progression: Res<ProgressionState>,
    flying: Res<Flying>,
    mut animators: Query<&mut TransitionAnimator>,
    mut landed: MessageWriter<FlightLanded>,
) {
    let now = time.elapsed_secs();
    let leg = progression.leg();
    for mut animator in &mut animators {
        animator.observe(leg, flying.0, now);
        if animator.tick(now) {
            landed.write(FlightLanded { leg });
        }
    }
}

fn land_flights(
    mut landed: MessageReader<FlightLanded>,
    mut flying: ResMut<Flying>,
    mut progression: ResMut<ProgressionState>,
) {
    for FlightLanded { leg } in landed.read() {
        info!("landed at {}", location(leg.1).display_name);
        flying.0 = false;
        *progression = progression.land();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use bevy::time::TimeUpdateStrategy;

    use crate::presets::CharacterPreset;
    use crate::trivia::CATALOG;

    const EPS: f32 = 1e-5;

    #[test]
    fn easing_hits_fixed_points() {
        assert!(ease_in_out_cubic(0.0).abs() < EPS);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < EPS);
        assert!((ease_in_out_cubic(1.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn easing_is_monotonic() {
        let mut last = ease_in_out_cubic(0.0);
        for i in 1..=1000 {
            let value = ease_in_out_cubic(i as f32 / 1000.0);
            assert!(value >= last);
            last = value;
        }
    }

    #[test]
    fn arc_is_symmetric_and_peaks_at_midpoint() {
        let height = 40.0;
        assert!(arc_offset(0.0, height).abs() < 1e-3);
        assert!(arc_offset(1.0, height).abs() < 1e-3);
        assert!((arc_offset(0.5, height) - height).abs() < 1e-3);
        for i in 0..=50 {
            let t = i as f32 / 100.0;
            assert!((arc_offset(t, height) - arc_offset(1.0 - t, height)).abs() < 1e-3);
        }
    }

    #[test]
    fn positions_meet_anchors_at_the_ends() {
        let (a, b) = (Vec3::new(1.0, 0.0, 2.0), Vec3::new(-5.0, 4.0, -8.0));
        assert!(world_position(a, b, 0.0, 10.0).distance(a) < 1e-3);
        assert!(world_position(a, b, 1.0, 10.0).distance(b) < 1e-3);
        let mid = world_position(a, b, 0.5, 10.0);
        assert!((mid.y - (2.0 + 10.0)).abs() < 1e-3);
    }

    #[test]
    fn sky_blend_interpolates_channels() {
        let mid = blend_rgb([0.0, 0.2, 1.0], [1.0, 0.4, 0.0], 0.5).to_srgba();
        assert!((mid.red - 0.5).abs() < EPS);
        assert!((mid.green - 0.3).abs() < EPS);
        assert!((mid.blue - 0.5).abs() < EPS);
    }

    #[test]
    fn heading_filter_converges_the_short_way() {
        let mut yaw = 3.0;
        let target = -3.0;
        for _ in 0..200 {
            yaw = approach_angle(yaw, target, 0.1);
        }
        let diff = (yaw - target).rem_euclid(std::f32::consts::TAU);
        assert!(diff < 1e-3 || diff > std::f32::consts::TAU - 1e-3);
        assert!(yaw > 3.0, "went the long way round: {yaw}");
        assert_eq!(approach(0.0, 10.0, 0.25), 2.5);
    }

    #[test]
    fn facing_follows_displacement() {
        let yaw = facing_yaw(Vec3::new(0.0, 5.0, -10.0)).unwrap();
        assert!(yaw.abs() < EPS);
        let yaw = facing_yaw(Vec3::new(10.0, 0.0, 0.0)).unwrap();
        assert!((yaw + std::f32::consts::FRAC_PI_2).abs() < EPS);
        assert!(facing_yaw(Vec3::Y).is_none());
    }

    #[test]
    fn camera_rig_is_rigid() {
        let rig = CameraRig {
            offset: Vec3::new(0.0, 6.0, 14.0),
            look_offset: Vec3::new(0.0, 1.0, 0.0),
        };
        let avatar = Vec3::new(3.0, 2.0, -7.0);
        let transform = rig.transform_for(avatar);
        assert!(transform.translation.distance(avatar + rig.offset) < EPS);
        let to_target = (avatar + rig.look_offset - transform.translation).normalize();
        assert!(transform.forward().dot(to_target) > 0.9999);
    }

    #[test]
    fn flight_runs_and_completes_once() {
        let mut animator = TransitionAnimator::new(MAP_PROFILE);
        animator.observe((0, 0), false, 0.0);
        assert!(!animator.tick(0.0));
        assert!(animator.sample(0.0).is_none());

        animator.observe((0, 1), true, 1.0);
        assert_eq!(animator.phase(), AnimatorPhase::Armed { start: 1.0 });
        assert!(!animator.tick(1.0));
        assert_eq!(animator.phase(), AnimatorPhase::Running { start: 1.0 });

        let frame = animator.sample(2.0).unwrap();
        assert_eq!((frame.source, frame.dest), (0, 1));
        assert!((frame.raw_progress - 0.5).abs() < EPS);
        assert!((frame.eased_progress - 0.5).abs() < EPS);
        assert!((frame.elapsed_ms - 1000.0).abs() < 1e-2);

        animator.observe((0, 1), true, 3.0);
        assert!(animator.tick(3.0));
        assert_eq!(animator.sample(3.0).unwrap().raw_progress, 1.0);

        animator.observe((0, 1), false, 3.1);
        assert!(!animator.tick(3.1));
        assert!(!animator.tick(3.2));
        assert_eq!(animator.phase(), AnimatorPhase::Idle);
    }

    #[test]
    fn new_leg_mid_flight_rebases() {
        let mut animator = TransitionAnimator::new(GLOBE_PROFILE);
        animator.observe((0, 1), true, 0.0);
        animator.tick(0.0);
        animator.tick(2.0);

        animator.observe((1, 2), true, 2.0);
        animator.tick(2.0);
        let frame = animator.sample(2.0).unwrap();
        assert_eq!((frame.source, frame.dest), (1, 2));
        assert_eq!(frame.raw_progress, 0.0);
        assert_eq!(frame.elapsed_ms, 0.0);

        let later = animator.sample(2.5).unwrap();
        assert!((later.elapsed_ms - 500.0).abs() < 1e-2);

        // The stale leg would have landed at 3.5; the rebased one must not.
        assert!(!animator.tick(3.5));
        assert!(animator.tick(5.5));
    }

    #[test]
    fn clearing_flag_cancels_without_landing() {
        let mut animator = TransitionAnimator::new(MAP_PROFILE);
        animator.observe((2, 3), true, 0.0);
        animator.tick(0.0);
        animator.tick(0.5);

        animator.observe((2, 3), false, 0.6);
        assert_eq!(animator.phase(), AnimatorPhase::Idle);
        assert!(!animator.tick(10.0));
        assert!(animator.sample(10.0).is_none());

        // Raising the flag again on the same leg does not resume the stale run.
        animator.observe((2, 3), true, 11.0);
        assert_eq!(animator.phase(), AnimatorPhase::Idle);
    }

    #[test]
    fn landing_clears_view_flag_but_keeps_location() {
        let state = ProgressionState::new("Ada")
            .start_game(CharacterPreset::Analyst)
            .unwrap();
        let question = CATALOG.iter().find(|q| q.id.0 == 7).unwrap();
        let state = state.answer_correctly(question).unwrap();

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, FlightPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(250)))
            .insert_resource(state)
            .insert_resource(Flying(true));
        app.world_mut().spawn(TransitionAnimator::new(MAP_PROFILE));

        app.update();
        app.update();
        assert!(app.world().resource::<Flying>().0);

        let mut frames = 0;
        while app.world().resource::<Flying>().0 && frames < 40 {
            app.update();
            frames += 1;
        }

        let progression = app.world().resource::<ProgressionState>();
        assert!(!app.world().resource::<Flying>().0);
        assert!(!progression.is_transitioning);
        assert_eq!(progression.current_location, 1);
        assert!(frames >= 4, "landed too early after {frames} frames");
    }
}
