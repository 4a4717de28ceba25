//! iCalendar component kinds and line spans (RFC 5545 §3.4-3.6).

/// Component kind for iCalendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// VCALENDAR wrapper component.
    Calendar,
    /// VEVENT component.
    Event,
    /// VTODO component.
    Todo,
    /// VJOURNAL component.
    Journal,
    /// VFREEBUSY component.
    FreeBusy,
    /// VTIMEZONE component.
    Timezone,
    /// VALARM component (nested within VEVENT/VTODO).
    Alarm,
    /// STANDARD sub-component of VTIMEZONE.
    Standard,
    /// DAYLIGHT sub-component of VTIMEZONE.
    Daylight,
    /// Unknown/X-component.
    Unknown,
}

impl ComponentKind {
    /// Returns the string name for this component kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "VCALENDAR",
            Self::Event => "VEVENT",
            Self::Todo => "VTODO",
            Self::Journal => "VJOURNAL",
            Self::FreeBusy => "VFREEBUSY",
            Self::Timezone => "VTIMEZONE",
            Self::Alarm => "VALARM",
            Self::Standard => "STANDARD",
            Self::Daylight => "DAYLIGHT",
            Self::Unknown => "X-UNKNOWN",
        }
    }

    /// Parses a component kind from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "VCALENDAR" => Self::Calendar,
            "VEVENT" => Self::Event,
            "VTODO" => Self::Todo,
            "VJOURNAL" => Self::Journal,
            "VFREEBUSY" => Self::FreeBusy,
            "VTIMEZONE" => Self::Timezone,
            "VALARM" => Self::Alarm,
            "STANDARD" => Self::Standard,
            "DAYLIGHT" => Self::Daylight,
            _ => Self::Unknown,
        }
    }

    /// Returns whether a VALARM may be nested in this component.
    #[must_use]
    pub const fn allows_alarms(self) -> bool {
        matches!(self, Self::Event | Self::Todo)
    }
}

/// Location of one component in the line buffers.
///
/// `start` is the BEGIN line and `end` the matching END line, both inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpan {
    /// Component type name as written after `BEGIN:`.
    pub type_name: String,
    pub start: usize,
    pub end: usize,
}

impl ComponentSpan {
    /// Returns the component kind of this span.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        ComponentKind::parse(&self.type_name)
    }

    /// Moves the END index after `count` lines were inserted inside the span.
    pub fn grow(&mut self, count: usize) {
        self.end += count;
    }
}
