//! Windows language identifiers (LCIDs) to IETF language tags.

use super::error::FlowError;
use phf::phf_map;

static LCID_TAGS: phf::Map<u16, &'static str> = phf_map! {
    0x0401u16 => "ar-SA",
    0x0402u16 => "bg-BG",
    0x0403u16 => "ca-ES",
    0x0404u16 => "zh-TW",
    0x0405u16 => "cs-CZ",
    0x0406u16 => "da-DK",
    0x0407u16 => "de-DE",
    0x0408u16 => "el-GR",
    0x0409u16 => "en-US",
    0x040Au16 => "es-ES",
    0x040Bu16 => "fi-FI",
    0x040Cu16 => "fr-FR",
    0x040Du16 => "he-IL",
    0x040Eu16 => "hu-HU",
    0x040Fu16 => "is-IS",
    0x0410u16 => "it-IT",
    0x0411u16 => "ja-JP",
    0x0412u16 => "ko-KR",
    0x0413u16 => "nl-NL",
    0x0414u16 => "nb-NO",
    0x0415u16 => "pl-PL",
    0x0416u16 => "pt-BR",
    0x0418u16 => "ro-RO",
    0x0419u16 => "ru-RU",
    0x041Au16 => "hr-HR",
    0x041Bu16 => "sk-SK",
    0x041Cu16 => "sq-AL",
    0x041Du16 => "sv-SE",
    0x041Eu16 => "th-TH",
    0x041Fu16 => "tr-TR",
    0x0420u16 => "ur-PK",
    0x0421u16 => "id-ID",
    0x0422u16 => "uk-UA",
    0x0423u16 => "be-BY",
    0x0424u16 => "sl-SI",
    0x0425u16 => "et-EE",
    0x0426u16 => "lv-LV",
    0x0427u16 => "lt-LT",
    0x0429u16 => "fa-IR",
    0x042Au16 => "vi-VN",
    0x042Bu16 => "hy-AM",
    0x042Du16 => "eu-ES",
    0x042Fu16 => "mk-MK",
    0x0436u16 => "af-ZA",
    0x0437u16 => "ka-GE",
    0x0439u16 => "hi-IN",
    0x043Eu16 => "ms-MY",
    0x0441u16 => "sw-KE",
    0x0445u16 => "bn-IN",
    0x0449u16 => "ta-IN",
    0x0456u16 => "gl-ES",
    0x0804u16 => "zh-CN",
    0x0807u16 => "de-CH",
    0x0809u16 => "en-GB",
    0x080Au16 => "es-MX",
    0x080Cu16 => "fr-BE",
    0x0810u16 => "it-CH",
    0x0813u16 => "nl-BE",
    0x0814u16 => "nn-NO",
    0x0816u16 => "pt-PT",
    0x0C04u16 => "zh-HK",
    0x0C07u16 => "de-AT",
    0x0C09u16 => "en-AU",
    0x0C0Au16 => "es-ES",
    0x0C0Cu16 => "fr-CA",
    0x1004u16 => "zh-SG",
    0x1009u16 => "en-CA",
    0x100Cu16 => "fr-CH",
    0x1409u16 => "en-NZ",
    0x1809u16 => "en-IE",
    0x1C09u16 => "en-ZA",
};

/// IETF language tag for a Windows LCID.
pub fn language_tag(lcid: u16) -> Result<&'static str, FlowError> {
    LCID_TAGS
        .get(&lcid)
        .copied()
        .ok_or(FlowError::UnknownLocale(lcid))
}
