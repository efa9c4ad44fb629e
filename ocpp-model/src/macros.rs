//! Declarative composite definitions
//!
//! `composite!` turns a field list into a complete constrained value type:
//!
//! ```ignore
//! composite! {
//!     /// Identifier with optional vendor data
//!     pub struct Example {
//!         required {
//!             name: String = "name", Constraint::max_length(20);
//!         }
//!         optional {
//!             items: Vec<Other> = "items", Constraint::items(1, Some(5));
//!         }
//!     }
//! }
//! ```
//!
//! Each entry is `rust_name: Type = "wireName", constraint;`. Optional fields
//! are stored as `Option<Type>`. The expansion provides:
//!
//! - one `FieldSpec` associated const per field (`Example::NAME`)
//! - `new(required..)`, checking every required field
//! - getters, `set_*` (checked), `with_*` (checked, optional fields) and
//!   `*_mut` (unchecked) accessors
//! - `Composite`, `FieldValue`, `PartialEq`/`Eq` (NaN equals itself, `-0.0`
//!   equals `0.0`), `Hash` and `Debug`
//! - `Serialize`, and `Deserialize` routed through `new` and the setters
//!   (bypassed only inside `codec::decode_payload_lenient`)

macro_rules! composite {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            required {
                $( $(#[$rdoc:meta])* $rfield:ident : $rty:ty = $rwire:literal, $rcons:expr; )*
            }
            optional {
                $( $(#[$odoc:meta])* $ofield:ident : $oty:ty = $owire:literal, $ocons:expr; )*
            }
        }
    ) => {
        ::paste::paste! {
            $(#[$meta])*
            #[derive(Clone, ::serde::Serialize)]
            pub struct $name {
                $(
                    #[serde(rename = $rwire)]
                    $rfield: $rty,
                )*
                $(
                    #[serde(rename = $owire, skip_serializing_if = "Option::is_none")]
                    $ofield: Option<$oty>,
                )*
            }

            impl $name {
                $(
                    pub const [<$rfield:upper>]: $crate::constraint::FieldSpec =
                        $crate::constraint::FieldSpec::required($rwire, $rcons);
                )*
                $(
                    pub const [<$ofield:upper>]: $crate::constraint::FieldSpec =
                        $crate::constraint::FieldSpec::optional($owire, $ocons);
                )*

                /// Construct from every required field. Optional fields start unset.
                #[allow(clippy::too_many_arguments)]
                pub fn new($( $rfield: $rty ),*) -> Result<Self, $crate::error::ModelError> {
                    $(
                        $crate::composite::enforce(
                            stringify!($name),
                            &Self::[<$rfield:upper>],
                            &$rfield,
                        )?;
                    )*
                    Ok(Self {
                        $( $rfield, )*
                        $( $ofield: None, )*
                    })
                }

                $(
                    $(#[$rdoc])*
                    pub fn $rfield(&self) -> &$rty {
                        &self.$rfield
                    }

                    /// Unchecked mutable access. Call `validate()` before relying on the result.
                    pub fn [<$rfield _mut>](&mut self) -> &mut $rty {
                        &mut self.$rfield
                    }

                    pub fn [<set_ $rfield>](
                        &mut self,
                        value: $rty,
                    ) -> Result<&mut Self, $crate::error::ModelError> {
                        $crate::composite::enforce(
                            stringify!($name),
                            &Self::[<$rfield:upper>],
                            &value,
                        )?;
                        self.$rfield = value;
                        Ok(self)
                    }
                )*

                $(
                    $(#[$odoc])*
                    pub fn $ofield(&self) -> Option<&$oty> {
                        self.$ofield.as_ref()
                    }

                    /// Unchecked mutable access. Call `validate()` before relying on the result.
                    pub fn [<$ofield _mut>](&mut self) -> &mut Option<$oty> {
                        &mut self.$ofield
                    }

                    /// `None` always succeeds; a rejected value leaves the field as it was.
                    pub fn [<set_ $ofield>](
                        &mut self,
                        value: Option<$oty>,
                    ) -> Result<&mut Self, $crate::error::ModelError> {
                        $crate::composite::enforce(
                            stringify!($name),
                            &Self::[<$ofield:upper>],
                            &value,
                        )?;
                        self.$ofield = value;
                        Ok(self)
                    }

                    pub fn [<with_ $ofield>](
                        mut self,
                        value: $oty,
                    ) -> Result<Self, $crate::error::ModelError> {
                        self.[<set_ $ofield>](Some(value))?;
                        Ok(self)
                    }
                )*
            }

            impl $crate::composite::Composite for $name {
                const TYPE_NAME: &'static str = stringify!($name);

                fn field_specs() -> &'static [$crate::constraint::FieldSpec] {
                    static SPECS: &[$crate::constraint::FieldSpec] = &[
                        $( $name::[<$rfield:upper>], )*
                        $( $name::[<$ofield:upper>], )*
                    ];
                    SPECS
                }

                fn fields(&self) -> Vec<$crate::composite::Field<'_>> {
                    let values: Vec<&dyn $crate::value::FieldValue> = vec![
                        $( &self.$rfield as &dyn $crate::value::FieldValue, )*
                        $( &self.$ofield as &dyn $crate::value::FieldValue, )*
                    ];
                    <Self as $crate::composite::Composite>::field_specs()
                        .iter()
                        .zip(values)
                        .map(|(spec, value)| $crate::composite::Field::new(spec, value))
                        .collect()
                }
            }

            impl $crate::value::FieldValue for $name {
                fn satisfies(&self, constraint: &$crate::constraint::Constraint) -> bool {
                    constraint.check_unbounded()
                }

                fn validate_nested(&self) -> bool {
                    $crate::composite::validate(self)
                }

                fn collect_violations(
                    &self,
                    path: &str,
                    out: &mut Vec<$crate::composite::Violation>,
                ) {
                    $crate::composite::collect_violations(self, path, out)
                }

                fn hash_value(&self, state: &mut dyn ::std::hash::Hasher) {
                    $crate::composite::hash_fields(self, state)
                }

                fn same_value(&self, other: &Self) -> bool {
                    self == other
                }
            }

            impl ::std::cmp::PartialEq for $name {
                #[allow(unused_variables)]
                fn eq(&self, other: &Self) -> bool {
                    true
                    $( && $crate::value::FieldValue::same_value(&self.$rfield, &other.$rfield) )*
                    $( && $crate::value::FieldValue::same_value(&self.$ofield, &other.$ofield) )*
                }
            }

            impl ::std::cmp::Eq for $name {}

            impl ::std::hash::Hash for $name {
                fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                    $crate::composite::hash_fields(self, state)
                }
            }

            impl ::std::fmt::Debug for $name {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    $crate::composite::render(self, f)
                }
            }

            const _: () = {
                #[derive(::serde::Deserialize)]
                struct Raw {
                    $(
                        #[serde(rename = $rwire)]
                        $rfield: $rty,
                    )*
                    $(
                        #[serde(rename = $owire, default)]
                        $ofield: Option<$oty>,
                    )*
                }

                #[allow(unused_variables, unused_mut)]
                fn build(raw: Raw) -> Result<$name, $crate::error::ModelError> {
                    if $crate::codec::is_lenient() {
                        return Ok($name {
                            $( $rfield: raw.$rfield, )*
                            $( $ofield: raw.$ofield, )*
                        });
                    }
                    let mut value = $name::new($( raw.$rfield ),*)?;
                    $( value.[<set_ $ofield>](raw.$ofield)?; )*
                    Ok(value)
                }

                impl<'de> ::serde::Deserialize<'de> for $name {
                    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                    where
                        D: ::serde::Deserializer<'de>,
                    {
                        let raw = <Raw as ::serde::Deserialize>::deserialize(deserializer)?;
                        build(raw).map_err(<D::Error as ::serde::de::Error>::custom)
                    }
                }
            };
        }
    };
}

pub(crate) use composite;

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use crate::composite::Composite;
    use crate::constraint::Constraint;
    use crate::error::ModelError;

    composite! {
        /// Label attached to a station
        pub struct Tag {
            required {
                label: String = "label", Constraint::max_length(8);
            }
            optional {}
        }
    }

    composite! {
        pub struct Station {
            required {
                name: String = "name", Constraint::max_length(20);
            }
            optional {
                tags: Vec<Tag> = "tags", Constraint::items(1, Some(5));
                power: f64 = "power", Constraint::between(0.0, 100.0);
            }
        }
    }

    composite! {
        pub struct Empty {
            required {}
            optional {}
        }
    }

    fn tags(n: usize) -> Vec<Tag> {
        (0..n).map(|i| Tag::new(format!("t{i}")).unwrap()).collect()
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_required_length_boundary() {
        assert!(Station::new("a".repeat(20)).is_ok());
        let err = Station::new("a".repeat(21)).unwrap_err();
        assert_eq!(err.field(), "name");
        assert!(matches!(err, ModelError::InvalidProperty { type_name: "Station", .. }));
    }

    #[test]
    fn test_optional_array_cardinality() {
        let mut station = Station::new("CS001".into()).unwrap();
        assert!(station.set_tags(Some(tags(6))).is_err());
        assert!(station.tags().is_none());
        assert!(station.set_tags(Some(Vec::new())).is_err());

        station.set_tags(Some(tags(5))).unwrap();
        assert!(station.validate());

        station.tags_mut().as_mut().unwrap()[2].label_mut().push_str("-too-long");
        assert!(!station.validate());
    }

    #[test]
    fn test_rejected_set_keeps_previous_value() {
        let mut station = Station::new("CS001".into()).unwrap();
        station.set_power(Some(50.0)).unwrap();
        assert!(station.set_power(Some(100.1)).is_err());
        assert_eq!(station.power(), Some(&50.0));

        station.set_power(None).unwrap();
        assert_eq!(station.power(), None);

        assert!(station.set_name("b".repeat(21)).is_err());
        assert_eq!(station.name(), "CS001");
    }

    #[test]
    fn test_invalid_nested_rejected_on_attach() {
        let mut bad = Tag::new("ok".into()).unwrap();
        *bad.label_mut() = "far-too-long".into();
        let station = Station::new("CS001".into()).unwrap();
        assert!(station.with_tags(vec![bad]).is_err());
    }

    #[test]
    fn test_violation_paths() {
        let mut station = Station::new("CS001".into())
            .unwrap()
            .with_tags(tags(2))
            .unwrap();
        station.tags_mut().as_mut().unwrap()[1].label_mut().push_str("xxxxxxxx");
        *station.name_mut() = "n".repeat(25);

        let violations = station.violations();
        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["name", "tags[1].label"]);
        assert_eq!(violations[1].type_name, "Tag");
        assert_eq!(station.first_violation().unwrap().field, "name");
    }

    #[test]
    fn test_identity() {
        let a = Station::new("CS001".into()).unwrap().with_tags(tags(3)).unwrap();
        let b = Station::new("CS001".into()).unwrap().with_tags(tags(3)).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let mut c = b.clone();
        c.tags_mut().as_mut().unwrap().reverse();
        assert_ne!(a, c);
    }

    #[test]
    #[allow(clippy::eq_op)]
    fn test_equality_reflexive_with_nan() {
        let mut station = Station::new("CS001".into()).unwrap();
        *station.power_mut() = Some(f64::NAN);
        assert!(!station.validate());

        let copy = station.clone();
        assert!(station == station);
        assert_eq!(station, copy);
        assert_eq!(hash_of(&station), hash_of(&copy));

        *station.power_mut() = Some(-0.0);
        let mut zero = copy;
        *zero.power_mut() = Some(0.0);
        assert_eq!(station, zero);
        assert_eq!(hash_of(&station), hash_of(&zero));

        zero.set_power(Some(1.0)).unwrap();
        assert_ne!(station, zero);
    }

    #[test]
    fn test_rendering() {
        let station = Station::new("CS001".into()).unwrap().with_power(11.0).unwrap();
        let text = format!("{station:?}");
        assert_eq!(
            text,
            "Station { name = \"CS001\", tags = None, power = Some(11.0), isValid = true }"
        );
        assert_eq!(format!("{:?}", Empty::new().unwrap()), "Empty { isValid = true }");
    }

    #[test]
    fn test_field_specs_in_declaration_order() {
        let names: Vec<&str> = Station::field_specs().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["name", "tags", "power"]);
        assert!(Station::POWER.is_optional());
        assert!(!Station::NAME.is_optional());
    }

    #[test]
    fn test_serde_goes_through_constructor() {
        let station: Station =
            serde_json::from_str(r#"{"name": "CS001", "tags": [{"label": "a"}]}"#).unwrap();
        assert_eq!(station.tags().map(Vec::len), Some(1));

        let json = serde_json::to_string(&station).unwrap();
        assert_eq!(json, r#"{"name":"CS001","tags":[{"label":"a"}]}"#);

        let err = serde_json::from_str::<Station>(r#"{"name": "CS001", "tags": []}"#).unwrap_err();
        assert!(err.to_string().contains("invalid property Station.tags"));
        assert!(serde_json::from_str::<Station>(r#"{"name": "CS001", "power": 120.0}"#).is_err());
        assert!(serde_json::from_str::<Station>(r#"{"tags": [{"label": "a"}]}"#).is_err());
    }
}
