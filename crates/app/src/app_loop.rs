//! Frame-stepped application state over a generated map: keyboard
//! navigation between nodes, timeline-driven travel, and an event
//! overlay sequenced the same way.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use game_core::animation::{AnimState, Interpolator, PropertyAnimation, SharedProperty};
use game_core::ease::Easing;
use game_core::geom::Vec2;
use game_core::map::{DetailMap, Direction};
use game_core::save::SaveState;
use game_core::timeline::Timeline;

const TRAVEL_TIME: Duration = Duration::from_millis(250);
const OVERLAY_LINE_DELAY: Duration = Duration::from_millis(200);

/// Input relevant to one frame, already decoded from raw keys.
#[derive(Default)]
pub struct FrameInput {
    pub direction: Option<Direction>,
    pub confirm: bool,
    pub regenerate: bool,
    pub next_biome: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppMode {
    /// Waiting at a node for input.
    Idle,
    /// A travel timeline is moving the player toward `target`.
    Traveling { target: usize },
    /// An event overlay sequence is running.
    EventOverlay,
}

pub struct AppState {
    pub map: DetailMap,
    pub save: SaveState,
    pub mode: AppMode,
    player_pos: Rc<Cell<Vec2>>,
    overlay_lines: Rc<RefCell<Vec<String>>>,
    confirm_requested: Rc<Cell<bool>>,
    active: Option<Timeline>,
}

impl AppState {
    pub fn new(map: DetailMap, save: SaveState) -> Self {
        let player_pos = Rc::new(Cell::new(map.graph.node(save.current_node).pos));
        Self {
            map,
            save,
            mode: AppMode::Idle,
            player_pos,
            overlay_lines: Rc::new(RefCell::new(Vec::new())),
            confirm_requested: Rc::new(Cell::new(false)),
            active: None,
        }
    }

    pub fn player_pos(&self) -> Vec2 {
        self.player_pos.get()
    }

    pub fn overlay_lines(&self) -> Vec<String> {
        self.overlay_lines.borrow().clone()
    }

    /// Advances the active sequence and handles navigation input.
    /// Call once per render frame.
    pub fn tick(&mut self, input: &FrameInput) {
        if input.confirm {
            self.confirm_requested.set(true);
        }

        if let Some(timeline) = &mut self.active {
            timeline.update();
            if timeline.is_finished() {
                self.active = None;
                self.sequence_finished();
            }
            // Movement is ignored while a sequence runs.
            return;
        }

        if let Some(direction) = input.direction {
            self.try_travel(direction);
        }
    }

    fn try_travel(&mut self, direction: Direction) {
        let current = self.save.current_node;
        let node = self.map.graph.node(current);
        if node.event.blocks_progress() && !self.save.is_completed(current) {
            return;
        }
        let Some(target) = self.map.graph.edge_in_direction(current, direction) else {
            return;
        };

        let read_pos = Rc::clone(&self.player_pos);
        let write_pos = Rc::clone(&self.player_pos);
        let property =
            SharedProperty::from_fns(move || read_pos.get(), move |value| write_pos.set(value));
        let travel = PropertyAnimation::with_interpolator(
            property,
            vec![AnimState {
                name: "arrive".to_string(),
                value: self.map.graph.node(target).pos,
                duration: TRAVEL_TIME,
                easing: Easing::SmoothStep,
            }],
            Interpolator::new(|a: &Vec2, b: &Vec2, t| *a + (*b - *a) * t),
        );

        let mut timeline = Timeline::builder()
            .include_action(travel.to_state("arrive").expect("the arrive state was just built"))
            .build();
        timeline.start();
        self.active = Some(timeline);
        self.mode = AppMode::Traveling { target };
    }

    fn sequence_finished(&mut self) {
        match self.mode {
            AppMode::Traveling { target } => {
                self.save.visit_node(target);
                let event = &self.map.graph.node(target).event;
                if event.can_be_started() && !self.save.is_completed(target) {
                    self.open_overlay(target);
                } else {
                    self.mode = AppMode::Idle;
                }
            }
            AppMode::EventOverlay => {
                let node = self.save.current_node;
                self.save.complete_node(node);
                self.mode = AppMode::Idle;
            }
            AppMode::Idle => {}
        }
    }

    /// Reveals the event text line by line, waits for confirmation,
    /// then wraps up. The description line is included conditionally,
    /// so events without one skip straight to the confirmation wait.
    fn open_overlay(&mut self, node: usize) {
        let event = self.map.graph.node(node).event.clone();
        self.overlay_lines.borrow_mut().clear();
        self.confirm_requested.set(false);

        let title_lines = Rc::clone(&self.overlay_lines);
        let title = event.display_name();
        let description_lines = Rc::clone(&self.overlay_lines);
        let description = event.description();
        let has_description = !description.is_empty();
        let confirmed = Rc::clone(&self.confirm_requested);
        let closing_lines = Rc::clone(&self.overlay_lines);

        let mut timeline = Timeline::builder()
            .action(move || title_lines.borrow_mut().push(title))
            .delay(OVERLAY_LINE_DELAY)
            .include_later(
                move || {
                    Timeline::builder()
                        .action(move || description_lines.borrow_mut().push(description))
                        .delay(OVERLAY_LINE_DELAY)
                        .build()
                },
                move || has_description,
            )
            .delay_until(move || confirmed.get())
            .action(move || closing_lines.borrow_mut().push("(done)".to_string()))
            .build();
        timeline.start();
        self.active = Some(timeline);
        self.mode = AppMode::EventOverlay;
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Instant;

    use game_core::map::{GraphBuilder, MapEvent};

    use super::*;

    /// start -- heal -- end, laid out left to right.
    fn row_map() -> DetailMap {
        let mut builder = GraphBuilder::new();
        let start = builder.add_node(Vec2::ZERO);
        let middle = builder.add_node(Vec2::new(10.0, 0.0));
        let end = builder.add_node(Vec2::new(20.0, 0.0));
        builder.connect(start, middle).unwrap();
        builder.connect(middle, end).unwrap();
        builder.set_event(middle, MapEvent::Heal { amount: 10 });

        DetailMap {
            name: "row".to_string(),
            graph: builder.build(),
            start_node: 0,
            end_node: 2,
            decorations: Vec::new(),
            animated_decorations: Vec::new(),
            is_area: false,
            biome: "wasteland".to_string(),
            progress: (0.0, 10.0),
            scrollable: true,
            cam_pos_offset: Vec2::ZERO,
        }
    }

    fn tick_until(state: &mut AppState, input: &FrameInput, done: impl Fn(&AppState) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(state) {
            assert!(Instant::now() < deadline, "sequence did not finish in time");
            state.tick(input);
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn moving_right_travels_to_the_neighbor_and_opens_its_event() {
        let map = row_map();
        let save = SaveState::new("row", 0);
        let mut state = AppState::new(map, save);

        state.tick(&FrameInput { direction: Some(Direction::Right), ..FrameInput::default() });
        assert_eq!(state.mode, AppMode::Traveling { target: 1 });

        tick_until(&mut state, &FrameInput::default(), |state| {
            !matches!(state.mode, AppMode::Traveling { .. })
        });
        assert_eq!(state.mode, AppMode::EventOverlay);
        assert_eq!(state.save.current_node, 1);
        assert_eq!(state.player_pos(), Vec2::new(10.0, 0.0));

        // Let the overlay reveal its lines, then confirm it away.
        tick_until(&mut state, &FrameInput::default(), |state| state.overlay_lines().len() >= 2);
        tick_until(&mut state, &FrameInput { confirm: true, ..FrameInput::default() }, |state| {
            state.mode == AppMode::Idle
        });
        assert!(state.save.is_completed(1));
    }

    #[test]
    fn moving_into_nothing_does_nothing() {
        let map = row_map();
        let save = SaveState::new("row", 0);
        let mut state = AppState::new(map, save);

        state.tick(&FrameInput { direction: Some(Direction::Up), ..FrameInput::default() });
        assert_eq!(state.mode, AppMode::Idle);
        assert_eq!(state.save.current_node, 0);
    }

    #[test]
    fn completed_events_do_not_reopen() {
        let map = row_map();
        let mut save = SaveState::new("row", 0);
        save.complete_node(1);
        let mut state = AppState::new(map, save);

        state.tick(&FrameInput { direction: Some(Direction::Right), ..FrameInput::default() });
        tick_until(&mut state, &FrameInput::default(), |state| state.mode == AppMode::Idle);
        assert_eq!(state.save.current_node, 1);
        assert!(state.overlay_lines().is_empty());
    }
}
