/// Section headings and fixed phrases of a rendered description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Headings {
    pub summary: &'static str,
    pub changes: &'static str,
    pub statistics: &'static str,
    pub files: &'static str,
    pub notes: &'static str,
    pub media: &'static str,
    pub merges: &'static str,
    pub no_commits: &'static str,
    pub breaking_change: &'static str,
    pub includes_tests: &'static str,
    pub no_tests: &'static str,
    pub commits: &'static str,
    pub files_changed: &'static str,
    pub insertions: &'static str,
    pub deletions: &'static str,
}

pub const ENGLISH: Headings = Headings {
    summary: "Summary",
    changes: "Changes",
    statistics: "Statistics",
    files: "Files changed",
    notes: "Notes",
    media: "Preview",
    merges: "Merges",
    no_commits: "No commits yet",
    breaking_change: "Contains a breaking change",
    includes_tests: "Includes test changes",
    no_tests: "No test files were modified",
    commits: "Commits",
    files_changed: "Files",
    insertions: "Insertions",
    deletions: "Deletions",
};

const SPANISH: Headings = Headings {
    summary: "Resumen",
    changes: "Cambios",
    statistics: "Estadísticas",
    files: "Archivos modificados",
    notes: "Notas",
    media: "Vista previa",
    merges: "Fusiona",
    no_commits: "Todavía no hay commits",
    breaking_change: "Contiene un cambio incompatible",
    includes_tests: "Incluye cambios en pruebas",
    no_tests: "No se modificaron archivos de prueba",
    commits: "Commits",
    files_changed: "Archivos",
    insertions: "Inserciones",
    deletions: "Eliminaciones",
};

const FRENCH: Headings = Headings {
    summary: "Résumé",
    changes: "Modifications",
    statistics: "Statistiques",
    files: "Fichiers modifiés",
    notes: "Remarques",
    media: "Aperçu",
    merges: "Fusionne",
    no_commits: "Aucun commit pour le moment",
    breaking_change: "Contient un changement incompatible",
    includes_tests: "Inclut des modifications de tests",
    no_tests: "Aucun fichier de test modifié",
    commits: "Commits",
    files_changed: "Fichiers",
    insertions: "Insertions",
    deletions: "Suppressions",
};

const GERMAN: Headings = Headings {
    summary: "Zusammenfassung",
    changes: "Änderungen",
    statistics: "Statistik",
    files: "Geänderte Dateien",
    notes: "Hinweise",
    media: "Vorschau",
    merges: "Führt zusammen",
    no_commits: "Noch keine Commits",
    breaking_change: "Enthält eine inkompatible Änderung",
    includes_tests: "Enthält Teständerungen",
    no_tests: "Keine Testdateien geändert",
    commits: "Commits",
    files_changed: "Dateien",
    insertions: "Einfügungen",
    deletions: "Löschungen",
};

/// Headings for a language tag such as `de` or `fr-CA`.
/// Unknown languages fall back to English.
pub fn for_language(language: &str) -> &'static Headings {
    let primary = language
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match primary.as_str() {
        "es" => &SPANISH,
        "fr" => &FRENCH,
        "de" => &GERMAN,
        _ => &ENGLISH,
    }
}
