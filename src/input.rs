// input.rs: window pointer events to controller input
//
// egui gets every event first. A press it consumes (menu, status bar) never
// starts a drag, but once a drag is running its moves, release and leave
// always reach the controller so the gesture can end over a panel.

use dome_gallery::{Phase, PointerPos, RendererSink, RotationController, Scheduler};
use winit::event::TouchPhase;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down(PointerPos),
    Move(PointerPos),
    Up(PointerPos),
    Leave,
}

/// Whether an input egui may have consumed still goes to the controller.
pub fn reaches_controller(input: PointerInput, consumed_by_ui: bool, phase: Phase) -> bool {
    if !consumed_by_ui {
        return true;
    }
    match input {
        PointerInput::Down(_) => false,
        _ => phase == Phase::Dragging,
    }
}

/// Last cursor position and the touch that drives the drag.
#[derive(Debug, Default)]
pub struct PointerRouter {
    cursor: Option<PointerPos>,
    touch_id: Option<u64>,
}

impl PointerRouter {
    pub fn cursor_moved<S: Scheduler, K: RendererSink>(
        &mut self,
        controller: &mut RotationController<S, K>,
        pos: PointerPos,
        consumed_by_ui: bool,
    ) {
        self.cursor = Some(pos);
        route(controller, PointerInput::Move(pos), consumed_by_ui);
    }

    pub fn cursor_left<S: Scheduler, K: RendererSink>(
        &mut self,
        controller: &mut RotationController<S, K>,
        consumed_by_ui: bool,
    ) {
        self.cursor = None;
        route(controller, PointerInput::Leave, consumed_by_ui);
    }

    /// Left button. Needs a known cursor position.
    pub fn button<S: Scheduler, K: RendererSink>(
        &mut self,
        controller: &mut RotationController<S, K>,
        pressed: bool,
        consumed_by_ui: bool,
    ) {
        let Some(pos) = self.cursor else {
            return;
        };
        let input = if pressed {
            PointerInput::Down(pos)
        } else {
            PointerInput::Up(pos)
        };
        route(controller, input, consumed_by_ui);
    }

    /// Only the first touch drives the drag.
    pub fn touch<S: Scheduler, K: RendererSink>(
        &mut self,
        controller: &mut RotationController<S, K>,
        id: u64,
        phase: TouchPhase,
        pos: PointerPos,
        consumed_by_ui: bool,
    ) {
        let input = match phase {
            TouchPhase::Started => {
                if self.touch_id.is_some()
                    || !reaches_controller(PointerInput::Down(pos), consumed_by_ui, controller.phase())
                {
                    return;
                }
                self.touch_id = Some(id);
                PointerInput::Down(pos)
            }
            _ if self.touch_id != Some(id) => return,
            TouchPhase::Moved => PointerInput::Move(pos),
            TouchPhase::Ended => {
                self.touch_id = None;
                PointerInput::Up(pos)
            }
            TouchPhase::Cancelled => {
                self.touch_id = None;
                PointerInput::Leave
            }
        };
        route(controller, input, consumed_by_ui);
    }
}

fn route<S: Scheduler, K: RendererSink>(
    controller: &mut RotationController<S, K>,
    input: PointerInput,
    consumed_by_ui: bool,
) {
    if !reaches_controller(input, consumed_by_ui, controller.phase()) {
        log::trace!("pointer input {:?} kept by the UI", input);
        return;
    }
    match input {
        PointerInput::Down(pos) => controller.pointer_down(pos),
        PointerInput::Move(pos) => controller.pointer_move(pos),
        PointerInput::Up(pos) => controller.pointer_up(pos),
        PointerInput::Leave => controller.pointer_leave(),
    }
}
