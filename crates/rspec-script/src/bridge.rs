use std::collections::BTreeMap;

use rhai::{Array, Dynamic, ImmutableString, Map, FLOAT, INT};
use rspec_core::{RhaiSpecError, SpecValue};

pub(crate) fn spec_to_dynamic(value: &SpecValue) -> Result<Dynamic, RhaiSpecError> {
    match value {
        SpecValue::Bool(value) => Ok(Dynamic::from_bool(*value)),
        SpecValue::Number(value) => Ok(Dynamic::from_float(*value as FLOAT)),
        SpecValue::String(value) => Ok(Dynamic::from(value.clone())),
        SpecValue::Array(values) => {
            let mut array = Array::new();
            for value in values {
                array.push(spec_to_dynamic(value)?);
            }
            Ok(Dynamic::from_array(array))
        }
        SpecValue::Map(values) => {
            let mut map = Map::new();
            for (key, value) in values {
                map.insert(key.clone().into(), spec_to_dynamic(value)?);
            }
            Ok(Dynamic::from_map(map))
        }
    }
}

pub(crate) fn dynamic_to_spec(value: Dynamic) -> Result<SpecValue, RhaiSpecError> {
    if value.is::<bool>() {
        return Ok(SpecValue::Bool(value.cast::<bool>()));
    }
    if value.is::<INT>() {
        return Ok(SpecValue::Number(value.cast::<INT>() as f64));
    }
    if value.is::<FLOAT>() {
        return Ok(SpecValue::Number(value.cast::<FLOAT>()));
    }
    if value.is::<ImmutableString>() {
        return Ok(SpecValue::String(value.cast::<ImmutableString>().to_string()));
    }
    if value.is::<Array>() {
        let array = value.cast::<Array>();
        let mut out = Vec::with_capacity(array.len());
        for item in array {
            out.push(dynamic_to_spec(item)?);
        }
        return Ok(SpecValue::Array(out));
    }
    if value.is::<Map>() {
        let map = value.cast::<Map>();
        let mut out = BTreeMap::new();
        for (key, value) in map {
            out.insert(key.to_string(), dynamic_to_spec(value)?);
        }
        return Ok(SpecValue::Map(out));
    }

    Err(RhaiSpecError::new(
        "SCRIPT_VALUE_UNSUPPORTED",
        "Unsupported Rhai value type.",
    ))
}

#[cfg(test)]
mod bridge_tests {
    use super::*;

    #[test]
    fn scalar_values_round_trip() {
        for value in [
            SpecValue::Bool(true),
            SpecValue::Number(2.5),
            SpecValue::String("hi".to_string()),
        ] {
            let dynamic = spec_to_dynamic(&value).expect("to dynamic should pass");
            assert_eq!(dynamic_to_spec(dynamic).expect("back should pass"), value);
        }
    }

    #[test]
    fn rhai_integers_become_numbers() {
        let converted = dynamic_to_spec(Dynamic::from_int(3)).expect("int should convert");
        assert_eq!(converted, SpecValue::Number(3.0));
    }

    #[test]
    fn nested_containers_round_trip() {
        let value = SpecValue::Map(BTreeMap::from([(
            "items".to_string(),
            SpecValue::Array(vec![SpecValue::Number(1.0), SpecValue::Bool(false)]),
        )]));
        let dynamic = spec_to_dynamic(&value).expect("to dynamic should pass");
        assert_eq!(dynamic_to_spec(dynamic).expect("back should pass"), value);
    }

    #[test]
    fn unit_is_rejected_with_a_script_error() {
        let error = dynamic_to_spec(Dynamic::UNIT).expect_err("unit should be rejected");
        assert_eq!(error.code, "SCRIPT_VALUE_UNSUPPORTED");
    }
}
