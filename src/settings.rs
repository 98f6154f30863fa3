/// Timezone picker state.
pub struct SettingsScreen {
    zones: Vec<String>,
    system_label: String,
    pub cursor: usize,
    pub status: Option<String>,
}

impl SettingsScreen {
    /// Preselect the saved zone (first entry containing it), else the system
    /// zone, else the top of the list.
    pub fn new(zones: Vec<String>, system_label: String, saved: Option<&str>) -> Self {
        let cursor = match saved {
            Some(saved) => zones.iter().position(|z| z.contains(saved)),
            None => zones.iter().position(|z| *z == system_label),
        }
        .unwrap_or(0);
        Self {
            zones,
            system_label,
            cursor,
            status: None,
        }
    }

    pub fn zones(&self) -> &[String] {
        &self.zones
    }

    pub fn selected(&self) -> Option<&str> {
        self.zones.get(self.cursor).map(String::as_str)
    }

    /// Label to persist. An empty selection saves the system zone.
    pub fn label_to_save(&self) -> String {
        match self.selected() {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => self.system_label.clone(),
        }
    }

    pub fn move_by(&mut self, delta: isize) {
        if self.zones.is_empty() {
            return;
        }
        let last = self.zones.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zones() -> Vec<String> {
        vec![
            "GMT-5 (America/New_York)".to_string(),
            "GMT+0 (UTC)".to_string(),
            "GMT+1 (Europe/Berlin)".to_string(),
            "GMT+9 (Asia/Tokyo)".to_string(),
        ]
    }

    #[test]
    fn test_preselects_saved_zone() {
        let screen = SettingsScreen::new(zones(), "GMT+0 (UTC)".into(), Some("GMT+9 (Asia/Tokyo)"));
        assert_eq!(screen.selected(), Some("GMT+9 (Asia/Tokyo)"));

        // A bare id still matches by containment
        let screen = SettingsScreen::new(zones(), "GMT+0 (UTC)".into(), Some("Europe/Berlin"));
        assert_eq!(screen.cursor, 2);
    }

    #[test]
    fn test_preselects_system_zone_without_preference() {
        let screen = SettingsScreen::new(zones(), "GMT+0 (UTC)".into(), None);
        assert_eq!(screen.selected(), Some("GMT+0 (UTC)"));

        let screen = SettingsScreen::new(zones(), "GMT+3 (Europe/Istanbul)".into(), None);
        assert_eq!(screen.cursor, 0);
    }

    #[test]
    fn test_cursor_clamps() {
        let mut screen = SettingsScreen::new(zones(), "GMT+0 (UTC)".into(), None);
        screen.move_by(-10);
        assert_eq!(screen.cursor, 0);
        screen.move_by(100);
        assert_eq!(screen.cursor, 3);
    }

    #[test]
    fn test_empty_selection_saves_system_zone() {
        let screen = SettingsScreen::new(Vec::new(), "GMT+0 (UTC)".into(), None);
        assert_eq!(screen.selected(), None);
        assert_eq!(screen.label_to_save(), "GMT+0 (UTC)");
    }
}
