//! HTML entity mappings
//!
//! Characters that have a named (or fixed numeric) replacement when written
//! into markup attributes. Covers the markup-significant characters plus the
//! Latin-1 supplement entities of HTML 4.01.

use phf::phf_map;

/// Character to entity replacement mapping
pub static HTML_ENTITIES: phf::Map<char, &'static str> = phf_map! {
    // Markup-significant
    '&' => "&amp;",
    '<' => "&lt;",
    '>' => "&gt;",
    '"' => "&quot;",
    '\'' => "&#039;",

    // Latin-1 punctuation and symbols
    '\u{00A0}' => "&nbsp;",
    '¡' => "&iexcl;",
    '¢' => "&cent;",
    '£' => "&pound;",
    '¤' => "&curren;",
    '¥' => "&yen;",
    '¦' => "&brvbar;",
    '§' => "&sect;",
    '¨' => "&uml;",
    '©' => "&copy;",
    'ª' => "&ordf;",
    '«' => "&laquo;",
    '¬' => "&not;",
    '\u{00AD}' => "&shy;",
    '®' => "&reg;",
    '¯' => "&macr;",
    '°' => "&deg;",
    '±' => "&plusmn;",
    '²' => "&sup2;",
    '³' => "&sup3;",
    '´' => "&acute;",
    'µ' => "&micro;",
    '¶' => "&para;",
    '·' => "&middot;",
    '¸' => "&cedil;",
    '¹' => "&sup1;",
    'º' => "&ordm;",
    '»' => "&raquo;",
    '¼' => "&frac14;",
    '½' => "&frac12;",
    '¾' => "&frac34;",
    '¿' => "&iquest;",
    '×' => "&times;",
    '÷' => "&divide;",

    // Latin-1 letters
    'À' => "&Agrave;",
    'Á' => "&Aacute;",
    'Â' => "&Acirc;",
    'Ã' => "&Atilde;",
    'Ä' => "&Auml;",
    'Å' => "&Aring;",
    'Æ' => "&AElig;",
    'Ç' => "&Ccedil;",
    'È' => "&Egrave;",
    'É' => "&Eacute;",
    'Ê' => "&Ecirc;",
    'Ë' => "&Euml;",
    'Ì' => "&Igrave;",
    'Í' => "&Iacute;",
    'Î' => "&Icirc;",
    'Ï' => "&Iuml;",
    'Ð' => "&ETH;",
    'Ñ' => "&Ntilde;",
    'Ò' => "&Ograve;",
    'Ó' => "&Oacute;",
    'Ô' => "&Ocirc;",
    'Õ' => "&Otilde;",
    'Ö' => "&Ouml;",
    'Ø' => "&Oslash;",
    'Ù' => "&Ugrave;",
    'Ú' => "&Uacute;",
    'Û' => "&Ucirc;",
    'Ü' => "&Uuml;",
    'Ý' => "&Yacute;",
    'Þ' => "&THORN;",
    'ß' => "&szlig;",
    'à' => "&agrave;",
    'á' => "&aacute;",
    'â' => "&acirc;",
    'ã' => "&atilde;",
    'ä' => "&auml;",
    'å' => "&aring;",
    'æ' => "&aelig;",
    'ç' => "&ccedil;",
    'è' => "&egrave;",
    'é' => "&eacute;",
    'ê' => "&ecirc;",
    'ë' => "&euml;",
    'ì' => "&igrave;",
    'í' => "&iacute;",
    'î' => "&icirc;",
    'ï' => "&iuml;",
    'ð' => "&eth;",
    'ñ' => "&ntilde;",
    'ò' => "&ograve;",
    'ó' => "&oacute;",
    'ô' => "&ocirc;",
    'õ' => "&otilde;",
    'ö' => "&ouml;",
    'ø' => "&oslash;",
    'ù' => "&ugrave;",
    'ú' => "&uacute;",
    'û' => "&ucirc;",
    'ü' => "&uuml;",
    'ý' => "&yacute;",
    'þ' => "&thorn;",
    'ÿ' => "&yuml;",
};

/// Look up the entity replacement for a character
pub fn entity_for(c: char) -> Option<&'static str> {
    HTML_ENTITIES.get(&c).copied()
}
