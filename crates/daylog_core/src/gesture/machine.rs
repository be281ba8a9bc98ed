//! Touch gesture state machine for list rows.
//!
//! # Responsibility
//! - Classify one pointer's touch sequence as tap, swipe or long-press drag.
//! - Model the long-press delay as a host-scheduled timer identified by a
//!   token, so cancellation is token invalidation.
//!
//! # Invariants
//! - At most one row is armed, swiping or dragging at a time.
//! - A timer token is honoured only while the machine is still armed with
//!   that same token; every other firing is ignored.
//! - Swipe offsets stay within `[-max_reveal, 0]`.

use super::reorder::{project, Projection};
use super::GestureConfig;

/// Touch coordinate in presenter units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Lifecycle phase of a raw touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

/// Raw touch event forwarded by the list presenter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub point: Point,
    /// Row the touch sequence started on.
    pub row: usize,
}

impl TouchEvent {
    pub fn start(row: usize, x: f32, y: f32) -> Self {
        Self {
            phase: TouchPhase::Start,
            point: Point::new(x, y),
            row,
        }
    }

    pub fn moved(row: usize, x: f32, y: f32) -> Self {
        Self {
            phase: TouchPhase::Move,
            point: Point::new(x, y),
            row,
        }
    }

    pub fn end(row: usize, x: f32, y: f32) -> Self {
        Self {
            phase: TouchPhase::End,
            point: Point::new(x, y),
            row,
        }
    }
}

/// Identifies one scheduled long-press timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Rebuilds a token handed across a host boundary.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Observable machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Armed,
    Swiping,
    Dragging,
}

/// What the host should do after feeding one event.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutput {
    /// Nothing to reflect.
    None,
    /// Schedule `long_press_fired(token, ..)` after `delay_ms`.
    ScheduleLongPress { token: TimerToken, delay_ms: u64 },
    /// A vertical move handed the sequence back to native scrolling.
    ScrollYielded { row: usize },
    /// Live horizontal offset while swiping.
    SwipeMoved { row: usize, offset: f32 },
    /// Swipe released; `offset` is either `0` or `-revealed_offset`.
    SwipeSettled { row: usize, offset: f32, revealed: bool },
    /// Touch released without classification.
    Tap { row: usize },
    /// Long-press armed a drag; the host should give tactile feedback.
    DragStarted { row: usize, row_height: f32 },
    /// Live drag projection.
    DragMoved(Projection),
    /// Drag released; `from == to` means no net movement.
    DragEnded { from: usize, to: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    Armed {
        row: usize,
        start: Point,
        token: TimerToken,
    },
    Swiping {
        row: usize,
        start: Point,
        offset: f32,
    },
    Dragging {
        start: Point,
        projection: Projection,
    },
}

/// Single-pointer gesture interpreter for one list.
#[derive(Debug, Clone)]
pub struct GestureMachine {
    config: GestureConfig,
    state: State,
    next_token: u64,
}

impl Default for GestureMachine {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureMachine {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: State::Idle,
            next_token: 0,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn phase(&self) -> GesturePhase {
        match self.state {
            State::Idle => GesturePhase::Idle,
            State::Armed { .. } => GesturePhase::Armed,
            State::Swiping { .. } => GesturePhase::Swiping,
            State::Dragging { .. } => GesturePhase::Dragging,
        }
    }

    /// Row the in-flight gesture belongs to, if any.
    pub fn active_row(&self) -> Option<usize> {
        match self.state {
            State::Idle => None,
            State::Armed { row, .. } | State::Swiping { row, .. } => Some(row),
            State::Dragging { projection, .. } => Some(projection.dragged),
        }
    }

    /// Returns to idle from any state; a pending timer becomes stale.
    pub fn cancel(&mut self) {
        self.state = State::Idle;
    }

    /// Feeds one raw touch event.
    pub fn handle(&mut self, event: TouchEvent) -> GestureOutput {
        match event.phase {
            TouchPhase::Start => self.touch_start(event.row, event.point),
            TouchPhase::Move => self.touch_move(event.point),
            TouchPhase::End => self.touch_end(event.point),
        }
    }

    /// Arms a new sequence on `row`, invalidating any previous timer.
    pub fn touch_start(&mut self, row: usize, point: Point) -> GestureOutput {
        let token = TimerToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        self.state = State::Armed {
            row,
            start: point,
            token,
        };
        GestureOutput::ScheduleLongPress {
            token,
            delay_ms: self.config.long_press_ms,
        }
    }

    pub fn touch_move(&mut self, point: Point) -> GestureOutput {
        match self.state {
            State::Idle => GestureOutput::None,
            State::Armed { row, start, .. } => {
                let dist_x = start.x - point.x;
                let dist_y = start.y - point.y;
                if dist_y.abs() > dist_x.abs() {
                    if dist_y.abs() > self.config.scroll_slop {
                        self.state = State::Idle;
                        return GestureOutput::ScrollYielded { row };
                    }
                    return GestureOutput::None;
                }
                if dist_x.abs() > dist_y.abs() {
                    let offset = self.swipe_offset(dist_x);
                    self.state = State::Swiping { row, start, offset };
                    return GestureOutput::SwipeMoved { row, offset };
                }
                GestureOutput::None
            }
            State::Swiping { row, start, .. } => {
                let dist_x = start.x - point.x;
                let dist_y = start.y - point.y;
                if dist_y.abs() > dist_x.abs() {
                    return GestureOutput::None;
                }
                let offset = self.swipe_offset(dist_x);
                self.state = State::Swiping { row, start, offset };
                GestureOutput::SwipeMoved { row, offset }
            }
            State::Dragging { start, projection } => {
                let next = project(
                    projection.dragged,
                    point.y - start.y,
                    projection.row_height,
                    projection.len,
                );
                self.state = State::Dragging {
                    start,
                    projection: next,
                };
                GestureOutput::DragMoved(next)
            }
        }
    }

    pub fn touch_end(&mut self, point: Point) -> GestureOutput {
        let state = std::mem::replace(&mut self.state, State::Idle);
        match state {
            State::Idle => GestureOutput::None,
            State::Armed { row, .. } => GestureOutput::Tap { row },
            State::Swiping { row, start, .. } => {
                let revealed = start.x - point.x > self.config.reveal_threshold;
                let offset = if revealed {
                    -self.config.revealed_offset
                } else {
                    0.0
                };
                GestureOutput::SwipeSettled {
                    row,
                    offset,
                    revealed,
                }
            }
            State::Dragging { projection, .. } => GestureOutput::DragEnded {
                from: projection.dragged,
                to: projection.target,
            },
        }
    }

    /// Delivers a long-press timer firing.
    ///
    /// `row_height` is the rendered height of the armed row and `row_count`
    /// the current list length; both are captured once per drag.
    pub fn long_press_fired(
        &mut self,
        token: TimerToken,
        row_height: f32,
        row_count: usize,
    ) -> GestureOutput {
        let State::Armed {
            row,
            start,
            token: armed,
        } = self.state
        else {
            return GestureOutput::None;
        };
        if armed != token {
            return GestureOutput::None;
        }
        if !(row_height > 0.0) || row >= row_count {
            self.state = State::Idle;
            return GestureOutput::None;
        }

        self.state = State::Dragging {
            start,
            projection: project(row, 0.0, row_height, row_count),
        };
        GestureOutput::DragStarted { row, row_height }
    }

    fn swipe_offset(&self, dist_x: f32) -> f32 {
        if dist_x > 0.0 {
            -dist_x.min(self.config.max_reveal)
        } else {
            0.0
        }
    }
}
