//! Type names as they appear in EPL declarations

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::display::write_ident;

/// A declared class or type: `string`, `com.acme.Order`, `java.util.Map<String, Object>`,
/// `int[primitive]`, `long[][]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
    /// Dotted class identifier
    pub name: String,
    /// Generic type arguments between `<` and `>`
    pub type_args: Vec<TypeName>,
    /// Array dimensions, outermost first
    pub dimensions: Vec<ArrayDimension>,
}

/// One `[]` suffix, optionally qualified (`[primitive]`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayDimension {
    pub qualifier: Option<String>,
}

impl TypeName {
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_args: Vec::new(),
            dimensions: Vec::new(),
        }
    }

    pub fn is_array(&self) -> bool {
        !self.dimensions.is_empty()
    }

    /// Element type of an array, `None` when this is not an array.
    pub fn element_type(&self) -> Option<TypeName> {
        if self.dimensions.is_empty() {
            return None;
        }
        let mut inner = self.clone();
        inner.dimensions.remove(0);
        Some(inner)
    }

    pub fn with_dimension(mut self, qualifier: Option<String>) -> Self {
        self.dimensions.push(ArrayDimension { qualifier });
        self
    }
}

/// Writes a dotted name, escaping each segment that needs it.
pub(crate) fn write_dotted(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    for (i, part) in name.split('.').enumerate() {
        if i > 0 {
            f.write_str(".")?;
        }
        write_ident(f, part)?;
    }
    Ok(())
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dotted(f, &self.name)?;
        if !self.type_args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        for dim in &self.dimensions {
            match &dim.qualifier {
                Some(q) => {
                    f.write_str("[")?;
                    write_ident(f, q)?;
                    f.write_str("]")?;
                }
                None => f.write_str("[]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_generic_array() {
        let t = TypeName {
            name: "java.util.Map".into(),
            type_args: vec![TypeName::simple("String"), TypeName::simple("Object")],
            dimensions: vec![],
        };
        assert_eq!(t.to_string(), "java.util.Map<String, Object>");

        let arr = TypeName::simple("int").with_dimension(Some("primitive".into()));
        assert_eq!(arr.to_string(), "int[primitive]");
        assert!(arr.is_array());
        assert_eq!(arr.element_type(), Some(TypeName::simple("int")));
    }

    #[test]
    fn test_display_escapes_keyword_segment() {
        let t = TypeName::simple("com.select.Order");
        assert_eq!(t.to_string(), "com.`select`.Order");
    }
}
