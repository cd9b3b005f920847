//! Split strategies for Internet Archive books.
//!
//! Every book here arrives as OCR plain text, so each strategy reads a
//! cleaned line array and leans on [`super::lines`] for the shared mechanics.
//! The name of each module is the strategy name stored on the source row.

mod carter_1765;
mod cassell_1883;
mod child_1829;
mod dods_1826;
mod kitchiner_1817;
mod leslie_1840;
mod marshall_1888;
mod raffald_1769;
mod randolph_1824;
mod rorer_1886;
mod smith_1727;
mod warne_1868;

use super::Strategy;

/// Built-in OCR strategies, keyed by the name stored on the source row
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("carter_1765", Strategy::Ocr(carter_1765::split)),
    ("cassell_1883", Strategy::Ocr(cassell_1883::split)),
    ("child_1829", Strategy::Ocr(child_1829::split)),
    ("dods_1826", Strategy::Ocr(dods_1826::split)),
    ("kitchiner_1817", Strategy::Ocr(kitchiner_1817::split)),
    ("leslie_1840", Strategy::Ocr(leslie_1840::split)),
    ("marshall_1888", Strategy::Ocr(marshall_1888::split)),
    ("raffald_1769", Strategy::Ocr(raffald_1769::split)),
    ("randolph_1824", Strategy::Ocr(randolph_1824::split)),
    ("rorer_1886", Strategy::Ocr(rorer_1886::split)),
    ("smith_1727", Strategy::Ocr(smith_1727::split)),
    ("warne_1868", Strategy::Ocr(warne_1868::split)),
];
