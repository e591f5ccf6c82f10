// Web-Modul: Body-Extraktion für die Lampen-API und die Portal-Seite

pub mod extract;

// Portal-Seite zur Compile-Zeit einbinden
// Die Datei wird direkt ins Binary eingebettet
pub const PORTAL_HTML: &str = include_str!("portal.html");
