//! Player kinematics: input, gravity, jumping and walk-cycle animation.

use crate::collision;
use crate::map::TileGrid;
use macroquad::prelude::*;

/// Horizontal orientation, doubling as the animation clip key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Walking left.
    Left,
    /// Walking right.
    Right,
    /// Standing still.
    Idle,
}

/// Frame count of each animation clip.
#[derive(Debug, Clone, Copy)]
pub struct ClipLengths {
    /// Walk-right frames.
    pub right: usize,
    /// Walk-left frames.
    pub left: usize,
    /// Idle frames.
    pub idle: usize,
}

impl Default for ClipLengths {
    fn default() -> Self {
        Self {
            right: 3,
            left: 3,
            idle: 1,
        }
    }
}

impl ClipLengths {
    /// Frame count for the given facing.
    pub fn frames(&self, facing: Facing) -> usize {
        match facing {
            Facing::Right => self.right,
            Facing::Left => self.left,
            Facing::Idle => self.idle,
        }
    }
}

/// Keyboard state sampled once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// "move left" held.
    pub left: bool,
    /// "move right" held.
    pub right: bool,
    /// jump key held.
    pub jump: bool,
}

/// Tuning constants, injected once at construction.
#[derive(Debug, Clone, Copy)]
pub struct PlayerConfig {
    /// Horizontal walk speed, pixels per tick.
    pub speed: f32,
    /// Downward acceleration, pixels per tick squared.
    pub gravity: f32,
    /// Initial jump velocity; negative is upward.
    pub jump_strength: f32,
    /// Ticks per animation frame.
    pub animation_speed: u32,
    /// Size of the visual sprite box.
    pub visual_size: Vec2,
    /// Size of the physical collision box.
    pub collision_size: Vec2,
    /// Animation clip lengths.
    pub clips: ClipLengths,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            gravity: 0.1,
            jump_strength: -5.0,
            animation_speed: 10,
            visual_size: vec2(64.0, 64.0),
            collision_size: vec2(46.0, 32.0),
            clips: ClipLengths::default(),
        }
    }
}

/// The single dynamic actor.
///
/// `pos` is the top-left of the visual box; the collision box is always
/// derived from it (horizontally centered, bottom aligned), never stored.
pub struct Player {
    /// Visual box top-left, world pixels.
    pub pos: Vec2,
    /// Vertical velocity, pixels per tick.
    pub velocity_y: f32,
    /// Current facing / clip key.
    pub facing: Facing,
    /// True while airborne from a jump.
    pub jumping: bool,
    /// True while a movement key is held.
    pub moving: bool,
    frame: usize,
    timer: u32,
    config: PlayerConfig,
}

impl Player {
    /// Creates a player at the given visual top-left position.
    pub fn new(pos: Vec2, config: PlayerConfig) -> Self {
        Self {
            pos,
            velocity_y: 0.0,
            facing: Facing::Idle,
            jumping: false,
            moving: false,
            frame: 0,
            timer: 0,
            config,
        }
    }

    /// The tuning constants this player was built with.
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    #[inline]
    fn box_offset(&self) -> Vec2 {
        let vis = self.config.visual_size;
        let col = self.config.collision_size;
        vec2((vis.x - col.x) / 2.0, vis.y - col.y)
    }

    /// The physical box, recomputed from `pos` on every call.
    pub fn collision_box(&self) -> Rect {
        let p = self.pos + self.box_offset();
        Rect::new(p.x, p.y, self.config.collision_size.x, self.config.collision_size.y)
    }

    fn place_collision_box(&mut self, top_left: Vec2) {
        self.pos = top_left - self.box_offset();
    }

    /// Frame index to display. Idle always shows frame 0; the walk-cycle
    /// index is kept across idle spells.
    pub fn current_frame(&self) -> usize {
        match self.facing {
            Facing::Idle => 0,
            _ => self.frame,
        }
    }

    /// Advances the player by one tick: input, gravity, collision
    /// resolution, then animation.
    ///
    /// `ground_y` is the synthetic ground plane for the collision box,
    /// `viewport height - collision box height`.
    pub fn tick(&mut self, input: &TickInput, grid: &TileGrid, tile: Vec2, ground_y: f32) {
        // Right is checked first and silently wins when both keys are held.
        let mut dx = 0.0;
        if input.right {
            dx = self.config.speed;
            self.facing = Facing::Right;
            self.moving = true;
        } else if input.left {
            dx = -self.config.speed;
            self.facing = Facing::Left;
            self.moving = true;
        } else {
            self.moving = false;
        }
        self.pos.x += dx;

        if input.jump && !self.jumping {
            self.jumping = true;
            self.velocity_y = self.config.jump_strength;
        }

        // Gravity applies even mid-jump; the arc is the sum of both.
        self.velocity_y += self.config.gravity;
        self.pos.y += self.velocity_y;

        let resolved =
            collision::resolve(grid, tile, self.collision_box(), dx, self.velocity_y, ground_y);
        self.place_collision_box(resolved.rect.point());
        self.velocity_y = resolved.velocity_y;
        if resolved.landed {
            self.jumping = false;
        }

        if self.moving {
            self.timer += 1;
            if self.timer >= self.config.animation_speed {
                self.frame = (self.frame + 1) % self.config.clips.frames(self.facing);
                self.timer = 0;
            }
        } else {
            self.facing = Facing::Idle;
        }
    }
}
