// ---------------------------------------------------------------------------
// Alias-based column lookup
// ---------------------------------------------------------------------------

/// A physical quantity together with the header captions it may appear under,
/// in priority order.
#[derive(Debug, Clone, Copy)]
pub struct Quantity {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

pub const FREQUENCY: Quantity = Quantity {
    name: "frequency",
    aliases: &["F[Hz]", "Частота f"],
};

pub const CAPACITANCE: Quantity = Quantity {
    name: "capacitance",
    aliases: &["C[F]", "Ёмкость C"],
};

pub const LOSS_TANGENT: Quantity = Quantity {
    name: "loss tangent",
    aliases: &["D[]", "D []", "tg", "tg(delta)", "tanδ", "tan(delta)"],
};

impl Quantity {
    /// Index of the column for this quantity.
    ///
    /// Aliases are tried in order and the first one present wins, so the
    /// result does not depend on column order when several aliases exist.
    /// Headers are trimmed and compared case-insensitively.
    pub fn locate<S: AsRef<str>>(&self, headers: &[S]) -> Option<usize> {
        self.aliases.iter().find_map(|alias| {
            headers
                .iter()
                .position(|h| eq_ignore_case(h.as_ref().trim(), alias))
        })
    }
}

/// Unicode-aware case-insensitive equality (the captions are not ASCII).
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
