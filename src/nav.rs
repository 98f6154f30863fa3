#[derive(Clone, Copy, PartialEq, Eq, Debug, num_derive::FromPrimitive)]
pub enum Screen {
    Clock = 0,
    Timer,
    Settings,
    About,
}

impl Screen {
    pub const ALL: [Screen; 4] = [Screen::Clock, Screen::Timer, Screen::Settings, Screen::About];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Clock => "Clock",
            Screen::Timer => "Timer",
            Screen::Settings => "Settings",
            Screen::About => "About",
        }
    }
}

/// Back stack of screens. Clock is always at the bottom.
pub struct Navigator {
    stack: Vec<Screen>,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Screen::Clock],
        }
    }

    pub fn current(&self) -> Screen {
        *self.stack.last().unwrap_or(&Screen::Clock)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Clock replaces the whole stack; anything else is pushed.
    pub fn navigate_to(&mut self, screen: Screen) {
        if screen == Screen::Clock {
            self.stack.clear();
        }
        self.stack.push(screen);
    }

    /// Pop one screen. `None` when already at the root, meaning exit.
    pub fn back(&mut self) -> Option<Screen> {
        if self.stack.len() > 1 {
            self.stack.pop();
            Some(self.current())
        } else {
            None
        }
    }
}
