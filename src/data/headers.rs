// Header rows written by each supported instrument. Included verbatim by
// `data/device.rs` and by the sample generator binary.

/// "Vector" impedance meter: eight columns with Russian captions.
pub const VECTOR_HEADERS: [&str; 8] = [
    "Частота f",
    "Энергия Q",
    "tg",
    "Импеданс Im",
    "Фаза Phase",
    "Индуктивность L",
    "Ёмкость C",
    "Резистивность R",
];

/// E7-30 LCR meter: twelve columns with bracketed SI units.
pub const E7_30_HEADERS: [&str; 12] = [
    "F[Hz]",
    "C[F]",
    "L[H]",
    "R[Ohm]",
    "G[S]",
    "B[S]",
    "X[Ohm]",
    "Z[Ohm]",
    "D[]",
    "Q[]",
    "Phi[degree]",
    "Ub[V]",
];
