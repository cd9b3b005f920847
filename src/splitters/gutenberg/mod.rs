//! Split strategies for Project Gutenberg books.
//!
//! Gutenberg editions are HTML, so these strategies work over the flattened
//! block list from [`super::markup`] and use heading levels, italics and
//! small capitals where OCR strategies have only line shapes.

mod acton_1845;
mod beeton_1861;
mod farmer_1896;
mod francatelli_1852;
mod glasse_1747;
mod rundell_1806;
mod simmons_1796;
mod soyer_1855;

use super::Strategy;

/// Built-in markup strategies, keyed by the name stored on the source row
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("acton_1845", Strategy::Markup(acton_1845::split)),
    ("beeton_1861", Strategy::Markup(beeton_1861::split)),
    ("farmer_1896", Strategy::Markup(farmer_1896::split)),
    ("francatelli_1852", Strategy::Markup(francatelli_1852::split)),
    ("glasse_1747", Strategy::Markup(glasse_1747::split)),
    ("rundell_1806", Strategy::Markup(rundell_1806::split)),
    ("simmons_1796", Strategy::Markup(simmons_1796::split)),
    ("soyer_1855", Strategy::Markup(soyer_1855::split)),
];
