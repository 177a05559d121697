use std::collections::HashMap;

/// Display slots the dashboard writes to, identified like page elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    ConnectionStatus,
    Temperature,
    Humidity,
    HeatIndex,
    StatusCard,
    ComfortStatus,
    Timestamp,
    DeviceId,
}

impl Slot {
    pub const ALL: [Self; 8] = [
        Self::ConnectionStatus,
        Self::Temperature,
        Self::Humidity,
        Self::HeatIndex,
        Self::StatusCard,
        Self::ComfortStatus,
        Self::Timestamp,
        Self::DeviceId,
    ];

    /// Stable element identifier of the slot
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::ConnectionStatus => "connection-status",
            Self::Temperature => "temperature-value",
            Self::Humidity => "humidity-value",
            Self::HeatIndex => "heat-index-value",
            Self::StatusCard => "status-card",
            Self::ComfortStatus => "comfort-status",
            Self::Timestamp => "timestamp",
            Self::DeviceId => "device-id",
        }
    }
}

/// Write-only display surface driven by the dashboard bridge
pub trait DashboardView {
    fn set_text(&mut self, slot: Slot, text: &str);

    /// Replace every style class of `slot` (space separated, like `className`)
    fn set_class_name(&mut self, slot: Slot, class_name: &str);

    /// Append one style class to `slot`
    fn add_class(&mut self, slot: Slot, class: &str);

    /// Called once after each handled event
    fn commit(&mut self) {}
}

/// Text and style classes of one slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    text: String,
    classes: Vec<String>,
}

impl Element {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// In-memory element store
#[derive(Debug, Clone, Default)]
pub struct PageModel {
    elements: HashMap<Slot, Element>,
    commits: u64,
}

impl PageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, slot: Slot) -> Option<&Element> {
        self.elements.get(&slot)
    }

    /// Current text of `slot`, empty if never written
    pub fn text(&self, slot: Slot) -> &str {
        self.element(slot).map_or("", Element::text)
    }

    pub fn classes(&self, slot: Slot) -> &[String] {
        self.element(slot).map_or(&[][..], Element::classes)
    }

    /// Number of completed handler passes
    pub const fn commits(&self) -> u64 {
        self.commits
    }

    fn element_mut(&mut self, slot: Slot) -> &mut Element {
        self.elements.entry(slot).or_default()
    }
}

impl DashboardView for PageModel {
    fn set_text(&mut self, slot: Slot, text: &str) {
        let element = self.element_mut(slot);
        element.text.clear();
        element.text.push_str(text);
    }

    fn set_class_name(&mut self, slot: Slot, class_name: &str) {
        let element = self.element_mut(slot);
        element.classes.clear();
        for class in class_name.split_whitespace() {
            if !element.has_class(class) {
                element.classes.push(class.to_string());
            }
        }
    }

    fn add_class(&mut self, slot: Slot, class: &str) {
        if class.is_empty() {
            return;
        }
        let element = self.element_mut(slot);
        if !element.has_class(class) {
            element.classes.push(class.to_string());
        }
    }

    fn commit(&mut self) {
        self.commits += 1;
    }
}
