use lazy_static::lazy_static;
use regex::Regex;

pub const DEFAULT_NAME: &str = "Receta Generada por IA";
pub const DEFAULT_DESCRIPTION: &str = "Receta creada para reducir desperdicio alimentario";
pub const DEFAULT_PREP_MINUTES: i32 = 30;

/// Fields pulled out of a free-text model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub nombre: String,
    pub descripcion: String,
    pub tiempo: i32,
}

/// First match of each marker wins; `.` stops at the line end, so each field
/// is the rest of the marker's line. Missing fields keep their defaults.
pub fn parse_reply(text: &str) -> ParsedReply {
    lazy_static! {
        static ref NAME_RE: Regex = Regex::new(r"NOMBRE:\s*(.*)").unwrap();
        static ref DESCRIPTION_RE: Regex = Regex::new(r"DESCRIPCIÓN:\s*(.*)").unwrap();
        static ref TIME_RE: Regex = Regex::new(r"TIEMPO:\s*(\d+)").unwrap();
    }

    let capture = |re: &Regex| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
    };

    let nombre = capture(&NAME_RE).unwrap_or_else(|| DEFAULT_NAME.to_string());
    let descripcion = capture(&DESCRIPTION_RE).unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
    let tiempo = capture(&TIME_RE)
        .and_then(|t| t.parse::<i32>().ok())
        .unwrap_or(DEFAULT_PREP_MINUTES);

    ParsedReply {
        nombre,
        descripcion,
        tiempo,
    }
}
