//! Unicode property names, values and aliases accepted by `\p{...}`
//!
//! Each table lists a canonical name followed by its aliases. Lookups are exact
//! (case-sensitive, no loose matching), as the dialect requires.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::error::ErrorKind;
use crate::jsre::ast::UnicodeProperty;

type AliasTable = &'static [(&'static str, &'static [&'static str])];

pub const GENERAL_CATEGORY: &str = "General_Category";
pub const SCRIPT: &str = "Script";
pub const SCRIPT_EXTENSIONS: &str = "Script_Extensions";

/// Properties that take a value, `\p{Name=Value}`
const NON_BINARY: AliasTable = &[
    (GENERAL_CATEGORY, &["gc"]),
    (SCRIPT, &["sc"]),
    (SCRIPT_EXTENSIONS, &["scx"]),
];

const BINARY: AliasTable = &[
    ("ASCII", &[]),
    ("ASCII_Hex_Digit", &["AHex"]),
    ("Alphabetic", &["Alpha"]),
    ("Any", &[]),
    ("Assigned", &[]),
    ("Bidi_Control", &["Bidi_C"]),
    ("Bidi_Mirrored", &["Bidi_M"]),
    ("Case_Ignorable", &["CI"]),
    ("Cased", &[]),
    ("Changes_When_Casefolded", &["CWCF"]),
    ("Changes_When_Casemapped", &["CWCM"]),
    ("Changes_When_Lowercased", &["CWL"]),
    ("Changes_When_NFKC_Casefolded", &["CWKCF"]),
    ("Changes_When_Titlecased", &["CWT"]),
    ("Changes_When_Uppercased", &["CWU"]),
    ("Dash", &[]),
    ("Default_Ignorable_Code_Point", &["DI"]),
    ("Deprecated", &["Dep"]),
    ("Diacritic", &["Dia"]),
    ("Emoji", &[]),
    ("Emoji_Component", &["EComp"]),
    ("Emoji_Modifier", &["EMod"]),
    ("Emoji_Modifier_Base", &["EBase"]),
    ("Emoji_Presentation", &["EPres"]),
    ("Extended_Pictographic", &["ExtPict"]),
    ("Extender", &["Ext"]),
    ("Grapheme_Base", &["Gr_Base"]),
    ("Grapheme_Extend", &["Gr_Ext"]),
    ("Hex_Digit", &["Hex"]),
    ("IDS_Binary_Operator", &["IDSB"]),
    ("IDS_Trinary_Operator", &["IDST"]),
    ("ID_Continue", &["IDC"]),
    ("ID_Start", &["IDS"]),
    ("Ideographic", &["Ideo"]),
    ("Join_Control", &["Join_C"]),
    ("Logical_Order_Exception", &["LOE"]),
    ("Lowercase", &["Lower"]),
    ("Math", &[]),
    ("Noncharacter_Code_Point", &["NChar"]),
    ("Pattern_Syntax", &["Pat_Syn"]),
    ("Pattern_White_Space", &["Pat_WS"]),
    ("Quotation_Mark", &["QMark"]),
    ("Radical", &[]),
    ("Regional_Indicator", &["RI"]),
    ("Sentence_Terminal", &["STerm"]),
    ("Soft_Dotted", &["SD"]),
    ("Terminal_Punctuation", &["Term"]),
    ("Unified_Ideograph", &["UIdeo"]),
    ("Uppercase", &["Upper"]),
    ("Variation_Selector", &["VS"]),
    ("White_Space", &["space"]),
    ("XID_Continue", &["XIDC"]),
    ("XID_Start", &["XIDS"]),
];

const GENERAL_CATEGORY_VALUES: AliasTable = &[
    ("Cased_Letter", &["LC"]),
    ("Close_Punctuation", &["Pe"]),
    ("Connector_Punctuation", &["Pc"]),
    ("Control", &["Cc", "cntrl"]),
    ("Currency_Symbol", &["Sc"]),
    ("Dash_Punctuation", &["Pd"]),
    ("Decimal_Number", &["Nd", "digit"]),
    ("Enclosing_Mark", &["Me"]),
    ("Final_Punctuation", &["Pf"]),
    ("Format", &["Cf"]),
    ("Initial_Punctuation", &["Pi"]),
    ("Letter", &["L"]),
    ("Letter_Number", &["Nl"]),
    ("Line_Separator", &["Zl"]),
    ("Lowercase_Letter", &["Ll"]),
    ("Mark", &["M", "Combining_Mark"]),
    ("Math_Symbol", &["Sm"]),
    ("Modifier_Letter", &["Lm"]),
    ("Modifier_Symbol", &["Sk"]),
    ("Nonspacing_Mark", &["Mn"]),
    ("Number", &["N"]),
    ("Open_Punctuation", &["Ps"]),
    ("Other", &["C"]),
    ("Other_Letter", &["Lo"]),
    ("Other_Number", &["No"]),
    ("Other_Punctuation", &["Po"]),
    ("Other_Symbol", &["So"]),
    ("Paragraph_Separator", &["Zp"]),
    ("Private_Use", &["Co"]),
    ("Punctuation", &["P", "punct"]),
    ("Separator", &["Z"]),
    ("Space_Separator", &["Zs"]),
    ("Spacing_Mark", &["Mc"]),
    ("Surrogate", &["Cs"]),
    ("Symbol", &["S"]),
    ("Titlecase_Letter", &["Lt"]),
    ("Unassigned", &["Cn"]),
    ("Uppercase_Letter", &["Lu"]),
];

const SCRIPT_VALUES: AliasTable = &[
    ("Adlam", &["Adlm"]),
    ("Ahom", &[]),
    ("Anatolian_Hieroglyphs", &["Hluw"]),
    ("Arabic", &["Arab"]),
    ("Armenian", &["Armn"]),
    ("Avestan", &["Avst"]),
    ("Balinese", &["Bali"]),
    ("Bamum", &["Bamu"]),
    ("Bassa_Vah", &["Bass"]),
    ("Batak", &["Batk"]),
    ("Bengali", &["Beng"]),
    ("Bhaiksuki", &["Bhks"]),
    ("Bopomofo", &["Bopo"]),
    ("Brahmi", &["Brah"]),
    ("Braille", &["Brai"]),
    ("Buginese", &["Bugi"]),
    ("Buhid", &["Buhd"]),
    ("Canadian_Aboriginal", &["Cans"]),
    ("Carian", &["Cari"]),
    ("Caucasian_Albanian", &["Aghb"]),
    ("Chakma", &["Cakm"]),
    ("Cham", &[]),
    ("Cherokee", &["Cher"]),
    ("Chorasmian", &["Chrs"]),
    ("Common", &["Zyyy"]),
    ("Coptic", &["Copt", "Qaac"]),
    ("Cuneiform", &["Xsux"]),
    ("Cypriot", &["Cprt"]),
    ("Cypro_Minoan", &["Cpmn"]),
    ("Cyrillic", &["Cyrl"]),
    ("Deseret", &["Dsrt"]),
    ("Devanagari", &["Deva"]),
    ("Dives_Akuru", &["Diak"]),
    ("Dogra", &["Dogr"]),
    ("Duployan", &["Dupl"]),
    ("Egyptian_Hieroglyphs", &["Egyp"]),
    ("Elbasan", &["Elba"]),
    ("Elymaic", &["Elym"]),
    ("Ethiopic", &["Ethi"]),
    ("Georgian", &["Geor"]),
    ("Glagolitic", &["Glag"]),
    ("Gothic", &["Goth"]),
    ("Grantha", &["Gran"]),
    ("Greek", &["Grek"]),
    ("Gujarati", &["Gujr"]),
    ("Gunjala_Gondi", &["Gong"]),
    ("Gurmukhi", &["Guru"]),
    ("Han", &["Hani"]),
    ("Hangul", &["Hang"]),
    ("Hanifi_Rohingya", &["Rohg"]),
    ("Hanunoo", &["Hano"]),
    ("Hatran", &["Hatr"]),
    ("Hebrew", &["Hebr"]),
    ("Hiragana", &["Hira"]),
    ("Imperial_Aramaic", &["Armi"]),
    ("Inherited", &["Zinh", "Qaai"]),
    ("Inscriptional_Pahlavi", &["Phli"]),
    ("Inscriptional_Parthian", &["Prti"]),
    ("Javanese", &["Java"]),
    ("Kaithi", &["Kthi"]),
    ("Kannada", &["Knda"]),
    ("Katakana", &["Kana"]),
    ("Kawi", &[]),
    ("Kayah_Li", &["Kali"]),
    ("Kharoshthi", &["Khar"]),
    ("Khitan_Small_Script", &["Kits"]),
    ("Khmer", &["Khmr"]),
    ("Khojki", &["Khoj"]),
    ("Khudawadi", &["Sind"]),
    ("Lao", &["Laoo"]),
    ("Latin", &["Latn"]),
    ("Lepcha", &["Lepc"]),
    ("Limbu", &["Limb"]),
    ("Linear_A", &["Lina"]),
    ("Linear_B", &["Linb"]),
    ("Lisu", &[]),
    ("Lycian", &["Lyci"]),
    ("Lydian", &["Lydi"]),
    ("Mahajani", &["Mahj"]),
    ("Makasar", &["Maka"]),
    ("Malayalam", &["Mlym"]),
    ("Mandaic", &["Mand"]),
    ("Manichaean", &["Mani"]),
    ("Marchen", &["Marc"]),
    ("Masaram_Gondi", &["Gonm"]),
    ("Medefaidrin", &["Medf"]),
    ("Meetei_Mayek", &["Mtei"]),
    ("Mende_Kikakui", &["Mend"]),
    ("Meroitic_Cursive", &["Merc"]),
    ("Meroitic_Hieroglyphs", &["Mero"]),
    ("Miao", &["Plrd"]),
    ("Modi", &[]),
    ("Mongolian", &["Mong"]),
    ("Mro", &["Mroo"]),
    ("Multani", &["Mult"]),
    ("Myanmar", &["Mymr"]),
    ("Nabataean", &["Nbat"]),
    ("Nag_Mundari", &["Nagm"]),
    ("Nandinagari", &["Nand"]),
    ("New_Tai_Lue", &["Talu"]),
    ("Newa", &[]),
    ("Nko", &["Nkoo"]),
    ("Nushu", &["Nshu"]),
    ("Nyiakeng_Puachue_Hmong", &["Hmnp"]),
    ("Ogham", &["Ogam"]),
    ("Ol_Chiki", &["Olck"]),
    ("Old_Hungarian", &["Hung"]),
    ("Old_Italic", &["Ital"]),
    ("Old_North_Arabian", &["Narb"]),
    ("Old_Permic", &["Perm"]),
    ("Old_Persian", &["Xpeo"]),
    ("Old_Sogdian", &["Sogo"]),
    ("Old_South_Arabian", &["Sarb"]),
    ("Old_Turkic", &["Orkh"]),
    ("Old_Uyghur", &["Ougr"]),
    ("Oriya", &["Orya"]),
    ("Osage", &["Osge"]),
    ("Osmanya", &["Osma"]),
    ("Pahawh_Hmong", &["Hmng"]),
    ("Palmyrene", &["Palm"]),
    ("Pau_Cin_Hau", &["Pauc"]),
    ("Phags_Pa", &["Phag"]),
    ("Phoenician", &["Phnx"]),
    ("Psalter_Pahlavi", &["Phlp"]),
    ("Rejang", &["Rjng"]),
    ("Runic", &["Runr"]),
    ("Samaritan", &["Samr"]),
    ("Saurashtra", &["Saur"]),
    ("Sharada", &["Shrd"]),
    ("Shavian", &["Shaw"]),
    ("Siddham", &["Sidd"]),
    ("SignWriting", &["Sgnw"]),
    ("Sinhala", &["Sinh"]),
    ("Sogdian", &["Sogd"]),
    ("Sora_Sompeng", &["Sora"]),
    ("Soyombo", &["Soyo"]),
    ("Sundanese", &["Sund"]),
    ("Syloti_Nagri", &["Sylo"]),
    ("Syriac", &["Syrc"]),
    ("Tagalog", &["Tglg"]),
    ("Tagbanwa", &["Tagb"]),
    ("Tai_Le", &["Tale"]),
    ("Tai_Tham", &["Lana"]),
    ("Tai_Viet", &["Tavt"]),
    ("Takri", &["Takr"]),
    ("Tamil", &["Taml"]),
    ("Tangsa", &["Tnsa"]),
    ("Tangut", &["Tang"]),
    ("Telugu", &["Telu"]),
    ("Thaana", &["Thaa"]),
    ("Thai", &[]),
    ("Tibetan", &["Tibt"]),
    ("Tifinagh", &["Tfng"]),
    ("Tirhuta", &["Tirh"]),
    ("Toto", &[]),
    ("Ugaritic", &["Ugar"]),
    ("Unknown", &["Zzzz"]),
    ("Vai", &["Vaii"]),
    ("Vithkuqi", &["Vith"]),
    ("Wancho", &["Wcho"]),
    ("Warang_Citi", &["Wara"]),
    ("Yezidi", &["Yezi"]),
    ("Yi", &["Yiii"]),
    ("Zanabazar_Square", &["Zanb"]),
];

/// Canonical name for every spelling in the table, canonical names included
fn alias_map(table: AliasTable) -> HashMap<&'static str, &'static str> {
    let mut map = HashMap::new();
    for (canonical, aliases) in table {
        map.insert(*canonical, *canonical);
        for alias in *aliases {
            map.insert(*alias, *canonical);
        }
    }
    map
}

static NON_BINARY_NAMES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| alias_map(NON_BINARY));
static BINARY_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| alias_map(BINARY));
static CATEGORIES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| alias_map(GENERAL_CATEGORY_VALUES));
static SCRIPTS: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| alias_map(SCRIPT_VALUES));

/// Canonical name of a property that takes a value
pub fn resolve_non_binary(name: &str) -> Option<&'static str> {
    NON_BINARY_NAMES.get(name).copied()
}

/// Canonical name of a binary property
pub fn resolve_binary(name: &str) -> Option<&'static str> {
    BINARY_NAMES.get(name).copied()
}

/// Canonical value of a property that takes a value
pub fn resolve_value(property: &str, value: &str) -> Option<&'static str> {
    match property {
        GENERAL_CATEGORY => CATEGORIES.get(value).copied(),
        SCRIPT | SCRIPT_EXTENSIONS => SCRIPTS.get(value).copied(),
        _ => None,
    }
}

/// Canonical names of all binary properties
pub fn binary_properties() -> impl Iterator<Item = &'static str> {
    BINARY.iter().map(|(name, _)| *name)
}

/// Canonical values of a property that takes a value
pub fn property_values(property: &str) -> impl Iterator<Item = &'static str> {
    let table: AliasTable = match property {
        GENERAL_CATEGORY => GENERAL_CATEGORY_VALUES,
        SCRIPT | SCRIPT_EXTENSIONS => SCRIPT_VALUES,
        _ => &[],
    };
    table.iter().map(|(name, _)| *name)
}

/// Why `\p{...}` was rejected. The grammar turns this into an error range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyRejection {
    /// `\p{}` or `\p{=x}`
    EmptyName,
    /// `Name=Value` where `Name` takes no value
    NotValued,
    /// `Name=Value` where `Value` is unknown for `Name`
    UnknownValue,
    /// A lone name that is neither a binary property nor a general category
    UnknownLone,
}

impl PropertyRejection {
    pub fn kind(self) -> ErrorKind {
        match self {
            PropertyRejection::EmptyName | PropertyRejection::NotValued => {
                ErrorKind::UnicodePropertyName
            }
            PropertyRejection::UnknownValue | PropertyRejection::UnknownLone => {
                ErrorKind::UnicodePropertyValue
            }
        }
    }
}

/// Resolve the name and value of a property escape to their canonical spellings.
///
/// A lone general category such as `\p{Lu}` resolves to
/// `General_Category=Uppercase_Letter`.
pub fn validate(name: &str, value: Option<&str>) -> Result<UnicodeProperty, PropertyRejection> {
    if name.is_empty() {
        return Err(PropertyRejection::EmptyName);
    }
    match value {
        Some(value) => {
            let property = resolve_non_binary(name).ok_or(PropertyRejection::NotValued)?;
            let value = resolve_value(property, value).ok_or(PropertyRejection::UnknownValue)?;
            Ok(UnicodeProperty {
                name: property.to_string(),
                value: Some(value.to_string()),
            })
        }
        None => {
            if let Some(binary) = resolve_binary(name) {
                return Ok(UnicodeProperty {
                    name: binary.to_string(),
                    value: None,
                });
            }
            let category = CATEGORIES
                .get(name)
                .ok_or(PropertyRejection::UnknownLone)?;
            Ok(UnicodeProperty {
                name: GENERAL_CATEGORY.to_string(),
                value: Some(category.to_string()),
            })
        }
    }
}
