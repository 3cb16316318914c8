//! Cryo-EM ontology annotation.
//!
//! Fixed mapping from pipeline object type names to CRYOEM ontology codes.
//! Ports whose type is absent from the table are annotated `unknown`.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Namespace prefix used in port `format` annotations.
pub const ONTOLOGY_NAME: &str = "cryoem";

/// URL the namespace prefix resolves to in the emitted document.
pub const ONTOLOGY_URL: &str = "http://scipion.i2pc.es/ontology/";

/// Format annotation for ports whose type has no ontology code.
pub const UNKNOWN_FORMAT: &str = "unknown";

const ENTRIES: [(&str, &str); 44] = [
    ("Acquisition", "CRYOEM_0000004"),
    ("AtomStruct", "CRYOEM_0000005"),
    ("Coordinate", "CRYOEM_0000006"),
    ("CTFModel", "CRYOEM_0000007"),
    ("DefocusGroup", "CRYOEM_0000008"),
    ("EMSet", "CRYOEM_0000009"),
    ("SetOfAtomStructs", "CRYOEM_0000023"),
    ("SetOfClasses", "CRYOEM_0000024"),
    ("SetOfClasses2D", "CRYOEM_0000065"),
    ("SetOfClasses3D", "CRYOEM_0000066"),
    ("SetOfClassesVol", "CRYOEM_0000067"),
    ("SetOfCoordinates", "CRYOEM_0000025"),
    ("SetOfCTF", "CRYOEM_0000026"),
    ("SetOfDefocusGroup", "CRYOEM_0000027"),
    ("SetOfFSCs", "CRYOEM_0000028"),
    ("SetOfImages", "CRYOEM_0000029"),
    ("SetOfImages2D", "CRYOEM_0000068"),
    ("SetOfAverages", "CRYOEM_0000094"),
    ("SetOfMicrographs", "CRYOEM_0000095"),
    ("SetOfMovies", "CRYOEM_0000096"),
    ("SetOfParticles", "CRYOEM_0000097"),
    ("Class2D", "CRYOEM_0000104"),
    ("Class3D", "CRYOEM_0000105"),
    ("SetOfMovieParticles", "CRYOEM_0000106"),
    ("SetOfImages3D", "CRYOEM_0000069"),
    ("SetOfVolumes", "CRYOEM_0000098"),
    ("ClassVol", "CRYOEM_0000107"),
    ("SetOfNormalModes", "CRYOEM_0000030"),
    ("SetOfSequences", "CRYOEM_0000031"),
    ("FSC", "CRYOEM_0000010"),
    ("Image", "CRYOEM_0000011"),
    ("Image2D", "CRYOEM_0000032"),
    ("Average", "CRYOEM_0000070"),
    ("Mask", "CRYOEM_0000071"),
    ("Micrograph", "CRYOEM_0000072"),
    ("Movie", "CRYOEM_0000073"),
    ("Particle", "CRYOEM_0000074"),
    ("MovieParticle", "CRYOEM_0000099"),
    ("Image3D", "CRYOEM_0000033"),
    ("Volume", "CRYOEM_0000075"),
    ("VolumeMask", "CRYOEM_0000076"),
    ("NormalMode", "CRYOEM_0000012"),
    ("Sequence", "CRYOEM_0000013"),
    ("Transform", "CRYOEM_0000014"),
];

fn table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| ENTRIES.iter().copied().collect())
}

/// Look up the ontology code for a pipeline object type name.
pub fn code_of(class_name: &str) -> Option<&'static str> {
    table().get(class_name).copied()
}

/// Port `format` annotation for a type name: `cryoem:<code>` when the type
/// is in the table, `unknown` otherwise.
pub fn format_of(class_name: &str) -> String {
    match code_of(class_name) {
        Some(code) => format!("{}:{}", ONTOLOGY_NAME, code),
        None => UNKNOWN_FORMAT.to_string(),
    }
}

/// All table entries in declaration order, for listing.
pub fn entries() -> impl Iterator<Item = (&'static str, &'static str)> {
    ENTRIES.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_type_formats_with_namespace() {
        assert_eq!(format_of("Volume"), "cryoem:CRYOEM_0000075");
        assert_eq!(format_of("SetOfParticles"), "cryoem:CRYOEM_0000097");
    }

    #[test]
    fn test_unknown_type_formats_as_unknown() {
        assert_eq!(format_of("UnknownWidget"), "unknown");
        assert_eq!(code_of("UnknownWidget"), None);
    }

    #[test]
    fn test_table_is_complete() {
        assert_eq!(entries().count(), 44);
        assert_eq!(code_of("Transform"), Some("CRYOEM_0000014"));
    }
}
