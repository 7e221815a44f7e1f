use crate::config::SceneConfig;

/// Phase shared by both ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    /// Parked in the home hangars, not rotated
    Idle,
    /// Flying toward the opposite hangar
    Moving,
    /// At (or past) the destination with rotation flags set
    Arrived,
}

/// Phase change produced by [`SceneState::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    Arrived,
    Reset,
}

/// Position and turn state of one ship along the X axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipAnimation {
    pub position: f32,
    pub rotated: bool,
    start: f32,
    /// +1.0 flies toward +X, -1.0 toward -X
    heading: f32,
    /// Signed destination bound
    destination: f32,
}

impl ShipAnimation {
    /// A ship parked at `-heading * distance` heading for `+heading * distance`.
    pub fn new(heading: f32, distance: f32) -> Self {
        let heading = heading.signum();
        let start = -heading * distance;
        Self {
            position: start,
            rotated: false,
            start,
            heading,
            destination: heading * distance,
        }
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn has_reached_destination(&self) -> bool {
        if self.heading > 0.0 {
            self.position >= self.destination
        } else {
            self.position <= self.destination
        }
    }

    fn advance(&mut self, speed: f32) {
        self.position += self.heading * speed;
    }

    fn reset(&mut self) {
        self.position = self.start;
        self.rotated = false;
    }
}

/// Animation state of the ship pair. Written only by [`SceneState::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub ships: [ShipAnimation; 2],
    phase: AnimationPhase,
    speed: f32,
    steps_per_frame: u32,
}

impl SceneState {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            ships: [
                ShipAnimation::new(1.0, config.hangar_distance),
                ShipAnimation::new(-1.0, config.hangar_distance),
            ],
            phase: AnimationPhase::Idle,
            speed: config.ship_speed,
            steps_per_frame: if config.legacy_double_step { 2 } else { 1 },
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn is_moving(&self) -> bool {
        self.phase == AnimationPhase::Moving
    }

    /// Position change per frame while moving, per ship.
    pub fn step_distance(&self) -> f32 {
        self.speed * self.steps_per_frame as f32
    }

    fn any_arrived(&self) -> bool {
        self.ships.iter().any(ShipAnimation::has_reached_destination)
    }

    /// Stops movement and sets both rotation flags once either ship is at its bound.
    fn check_arrival(&mut self) -> Option<Transition> {
        if !self.any_arrived() {
            return None;
        }
        let was_moving = self.is_moving();
        self.phase = AnimationPhase::Arrived;
        for ship in &mut self.ships {
            if !ship.rotated {
                ship.rotated = true;
            }
        }
        was_moving.then_some(Transition::Arrived)
    }

    /// Advance one frame.
    ///
    /// Order: start, arrival check, reset, advance (followed by another
    /// arrival check). A frame that starts the ships also moves them; a frame
    /// that resets them never starts them. When several transitions happen in
    /// one frame the last one is returned.
    pub fn step(&mut self, start_pressed: bool) -> Option<Transition> {
        let mut transition = None;

        if start_pressed && !self.is_moving() && !self.any_arrived() {
            self.phase = AnimationPhase::Moving;
            transition = Some(Transition::Started);
        }

        if let Some(t) = self.check_arrival() {
            transition = Some(t);
        }

        if start_pressed && !self.is_moving() {
            for ship in &mut self.ships {
                ship.reset();
            }
            self.phase = AnimationPhase::Idle;
            return Some(Transition::Reset);
        }

        if self.is_moving() {
            for _ in 0..self.steps_per_frame {
                for ship in &mut self.ships {
                    ship.advance(self.speed);
                }
            }
            if let Some(t) = self.check_arrival() {
                transition = Some(t);
            }
        }

        transition
    }
}
