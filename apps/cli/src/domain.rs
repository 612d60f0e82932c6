/// Row name of the national total in every statistical table.
pub const NATIONAL_TOTAL: &str = "ČR celkem";

/// The statistical tables published per region by the statistics office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Workplaces,
    PersonnelFte,
    Expenditure,
}

impl TableKind {
    pub const ALL: [Self; 3] = [Self::Workplaces, Self::PersonnelFte, Self::Expenditure];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Workplaces => "workplaces",
            Self::PersonnelFte => "personnel_fte",
            Self::Expenditure => "expenditure",
        }
    }

    /// Accepts the `as_str` names plus the short and Czech aliases
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        if let Some(kind) = Self::ALL.into_iter().find(|kind| kind.as_str() == value) {
            return Some(kind);
        }
        match value.as_str() {
            "pracoviste" => Some(Self::Workplaces),
            "personnel" | "fte" | "pracovnici" => Some(Self::PersonnelFte),
            "vydaje" => Some(Self::Expenditure),
            _ => None,
        }
    }

    /// Fragment of the published table title that identifies the table.
    pub const fn title_fragment(self) -> &'static str {
        match self {
            Self::Workplaces => "Pracoviště",
            Self::PersonnelFte => "Pracovníci",
            Self::Expenditure => "Výdaje",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Workplaces => "R&D workplaces",
            Self::PersonnelFte => "R&D personnel (FTE)",
            Self::Expenditure => "R&D expenditure (mil. CZK)",
        }
    }
}
