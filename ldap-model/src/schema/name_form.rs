use std::fmt;

/// NameForm schema object (RFC 4512 §4.1.7.2)
///
/// A name form names the structural object class it applies to and the
/// attribute types that must (or may) appear in the RDN of its entries.
/// Attribute types and object classes are held as OIDs; resolving them
/// against registries is up to the caller.
///
/// Once locked with [`NameForm::set_read_only`], every setter and adder is
/// a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameForm {
    oid: String,
    names: Vec<String>,
    description: Option<String>,
    obsolete: bool,
    read_only: bool,
    structural_object_class_oid: Option<String>,
    must_attribute_type_oids: Vec<String>,
    may_attribute_type_oids: Vec<String>,
}

impl NameForm {
    pub fn new(oid: &str) -> Self {
        Self {
            oid: oid.to_string(),
            ..Self::default()
        }
    }

    pub fn oid(&self) -> &str {
        &self.oid
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// First name, falling back to the OID
    pub fn name(&self) -> &str {
        self.names.first().map_or(self.oid.as_str(), String::as_str)
    }

    pub fn add_name(&mut self, name: &str) {
        if !self.read_only && !self.names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            self.names.push(name.to_string());
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: &str) {
        if !self.read_only {
            self.description = Some(description.to_string());
        }
    }

    pub fn is_obsolete(&self) -> bool {
        self.obsolete
    }

    pub fn set_obsolete(&mut self, obsolete: bool) {
        if !self.read_only {
            self.obsolete = obsolete;
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Lock the object; there is no way back
    pub fn set_read_only(&mut self) {
        self.read_only = true;
    }

    pub fn structural_object_class_oid(&self) -> Option<&str> {
        self.structural_object_class_oid.as_deref()
    }

    pub fn set_structural_object_class_oid(&mut self, oid: &str) {
        if !self.read_only {
            self.structural_object_class_oid = Some(oid.to_string());
        }
    }

    pub fn must_attribute_type_oids(&self) -> &[String] {
        &self.must_attribute_type_oids
    }

    pub fn set_must_attribute_type_oids(&mut self, oids: Vec<String>) {
        if !self.read_only {
            self.must_attribute_type_oids = oids;
        }
    }

    pub fn add_must_attribute_type_oid(&mut self, oid: &str) {
        if !self.read_only {
            push_unique(&mut self.must_attribute_type_oids, oid);
        }
    }

    pub fn may_attribute_type_oids(&self) -> &[String] {
        &self.may_attribute_type_oids
    }

    pub fn set_may_attribute_type_oids(&mut self, oids: Vec<String>) {
        if !self.read_only {
            self.may_attribute_type_oids = oids;
        }
    }

    pub fn add_may_attribute_type_oid(&mut self, oid: &str) {
        if !self.read_only {
            push_unique(&mut self.may_attribute_type_oids, oid);
        }
    }
}

fn push_unique(oids: &mut Vec<String>, oid: &str) {
    if !oids.iter().any(|o| o == oid) {
        oids.push(oid.to_string());
    }
}

/// Write `KEYWORD x` or `KEYWORD ( x $ y )`
fn write_oids(f: &mut fmt::Formatter<'_>, keyword: &str, oids: &[String]) -> fmt::Result {
    match oids {
        [] => Ok(()),
        [single] => write!(f, " {} {}", keyword, single),
        many => write!(f, " {} ( {} )", keyword, many.join(" $ ")),
    }
}

/// RFC 4512 `NameFormDescription`
impl fmt::Display for NameForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( {}", self.oid)?;
        match self.names.as_slice() {
            [] => {}
            [single] => write!(f, " NAME '{}'", single)?,
            many => {
                f.write_str(" NAME (")?;
                for name in many {
                    write!(f, " '{}'", name)?;
                }
                f.write_str(" )")?;
            }
        }
        if let Some(description) = &self.description {
            write!(f, " DESC '{}'", description.replace('\\', "\\5C").replace('\'', "\\27"))?;
        }
        if self.obsolete {
            f.write_str(" OBSOLETE")?;
        }
        if let Some(oc) = &self.structural_object_class_oid {
            write!(f, " OC {}", oc)?;
        }
        write_oids(f, "MUST", &self.must_attribute_type_oids)?;
        write_oids(f, "MAY", &self.may_attribute_type_oids)?;
        f.write_str(" )")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person_name_form() -> NameForm {
        let mut nf = NameForm::new("1.3.6.1.4.1.18060.0.4.1.5.1");
        nf.add_name("personNameForm");
        nf.set_description("person's name form");
        nf.set_structural_object_class_oid("2.5.6.6");
        nf.add_must_attribute_type_oid("2.5.4.3");
        nf.add_may_attribute_type_oid("2.5.4.4");
        nf.add_may_attribute_type_oid("0.9.2342.19200300.100.1.1");
        nf
    }

    #[test]
    fn test_display() {
        let nf = person_name_form();
        assert_eq!(
            nf.to_string(),
            "( 1.3.6.1.4.1.18060.0.4.1.5.1 NAME 'personNameForm' DESC 'person\\27s name form' \
             OC 2.5.6.6 MUST 2.5.4.3 MAY ( 2.5.4.4 $ 0.9.2342.19200300.100.1.1 ) )"
        );
        assert_eq!(NameForm::new("1.2.3").to_string(), "( 1.2.3 )");
    }

    #[test]
    fn test_adders_skip_duplicates() {
        let mut nf = person_name_form();
        nf.add_must_attribute_type_oid("2.5.4.3");
        nf.add_may_attribute_type_oid("2.5.4.4");
        nf.add_name("PERSONNAMEFORM");
        assert_eq!(nf.must_attribute_type_oids(), ["2.5.4.3"]);
        assert_eq!(nf.may_attribute_type_oids().len(), 2);
        assert_eq!(nf.names().len(), 1);
        assert_eq!(nf.name(), "personNameForm");
    }

    #[test]
    fn test_read_only() {
        let mut nf = person_name_form();
        let before = nf.clone();
        nf.set_read_only();
        nf.set_description("changed");
        nf.set_obsolete(true);
        nf.set_structural_object_class_oid("2.5.6.0");
        nf.add_must_attribute_type_oid("2.5.4.10");
        nf.set_may_attribute_type_oids(Vec::new());
        nf.add_name("other");

        assert!(nf.is_read_only());
        assert_eq!(nf.description(), before.description());
        assert!(!nf.is_obsolete());
        assert_eq!(nf.structural_object_class_oid(), Some("2.5.6.6"));
        assert_eq!(nf.must_attribute_type_oids(), before.must_attribute_type_oids());
        assert_eq!(nf.may_attribute_type_oids(), before.may_attribute_type_oids());
        assert_eq!(nf.names(), before.names());
    }

    #[test]
    fn test_copy_is_independent() {
        let original = person_name_form();
        let mut copy = original.clone();
        copy.add_must_attribute_type_oid("2.5.4.10");
        copy.set_must_attribute_type_oids(vec!["2.5.4.11".to_string()]);
        assert_eq!(original.must_attribute_type_oids(), ["2.5.4.3"]);
        assert_eq!(copy.must_attribute_type_oids(), ["2.5.4.11"]);
        assert_eq!(copy.name(), "personNameForm");
    }
}
