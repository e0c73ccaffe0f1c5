use crate::code::{code_to_voltage, voltage_to_code, Resolution, DEFAULT_VREF, MAX_BITS};

#[test]
fn zero_volts_is_half_scale() {
    for bits in 1..=MAX_BITS {
        for vref in [0.5f32, 2.5, DEFAULT_VREF, 10.0] {
            assert_eq!(
                voltage_to_code(bits, vref, 0.0),
                1u16 << (bits - 1),
                "bits={bits} vref={vref}"
            );
        }
    }
}

#[test]
fn endpoints_map_to_extremes() {
    for bits in 1..=MAX_BITS {
        let max = ((1u32 << bits) - 1) as u16;
        assert_eq!(voltage_to_code(bits, DEFAULT_VREF, DEFAULT_VREF), max);
        assert_eq!(voltage_to_code(bits, DEFAULT_VREF, -DEFAULT_VREF), 0);
    }
}

#[test]
fn minus_one_volt_at_full_resolution() {
    // (-1.0 / 4.096) * 8192 + 8192 = 6192
    assert_eq!(voltage_to_code(14, 4.096, -1.0), 6192);
    assert_eq!(voltage_to_code(14, 4.096, 1.0), 10192);
}

#[test]
fn monotonic_across_range() {
    let mut previous = 0u16;
    let steps = 4000;
    for i in 0..=steps {
        let v = -DEFAULT_VREF + 2.0 * DEFAULT_VREF * i as f32 / steps as f32;
        let code = voltage_to_code(14, DEFAULT_VREF, v);
        assert!(code >= previous, "code dropped at {v} V");
        previous = code;
    }
    assert_eq!(previous, 16383);
}

#[test]
fn clamps_beyond_reference() {
    for eps in [1e-3f32, 0.5, 100.0, f32::INFINITY] {
        assert_eq!(
            voltage_to_code(14, DEFAULT_VREF, DEFAULT_VREF + eps),
            voltage_to_code(14, DEFAULT_VREF, DEFAULT_VREF)
        );
        assert_eq!(
            voltage_to_code(14, DEFAULT_VREF, -DEFAULT_VREF - eps),
            voltage_to_code(14, DEFAULT_VREF, -DEFAULT_VREF)
        );
    }
}

#[test]
fn degenerate_inputs_give_zero() {
    assert_eq!(voltage_to_code(14, 0.0, 1.0), 0);
    assert_eq!(voltage_to_code(14, -0.0, -3.0), 0);
    assert_eq!(voltage_to_code(14, f32::NAN, 1.0), 0);
    assert_eq!(voltage_to_code(0, DEFAULT_VREF, 1.0), 0);
    assert_eq!(voltage_to_code(14, DEFAULT_VREF, f32::NAN), 0);
}

#[test]
fn negative_reference_is_sign_normalised() {
    assert_eq!(voltage_to_code(14, -DEFAULT_VREF, -1.0), 6192);
    assert_eq!(
        voltage_to_code(14, -DEFAULT_VREF, -1.0),
        voltage_to_code(14, DEFAULT_VREF, -1.0)
    );
    assert_eq!(voltage_to_code(14, -DEFAULT_VREF, DEFAULT_VREF), 16383);
    assert_eq!(code_to_voltage(14, -DEFAULT_VREF, 0), -DEFAULT_VREF);
}

#[test]
fn wide_resolution_clamps_to_fourteen_bits() {
    assert_eq!(voltage_to_code(16, DEFAULT_VREF, DEFAULT_VREF), 16383);
    assert_eq!(voltage_to_code(200, DEFAULT_VREF, 0.0), 8192);
    assert_eq!(Resolution::new(16), Resolution::FULL);
}

#[test]
fn resolution_limits() {
    let r = Resolution::new(12);
    assert_eq!(r.bits(), 12);
    assert_eq!(r.max_code(), 4095);
    assert_eq!(r.half_scale(), 2048);

    let none = Resolution::new(0);
    assert_eq!(none.max_code(), 0);
    assert_eq!(none.half_scale(), 0);
}

#[test]
fn inverse_conversion_recovers_voltage() {
    let lsb = 2.0 * DEFAULT_VREF / 16384.0;
    for v in [-4.0f32, -1.0, 0.0, 0.25, 3.3] {
        let code = voltage_to_code(14, DEFAULT_VREF, v);
        let back = code_to_voltage(14, DEFAULT_VREF, code);
        assert!((back - v).abs() <= lsb, "{v} V came back as {back} V");
    }
    assert_eq!(code_to_voltage(14, DEFAULT_VREF, 0), -DEFAULT_VREF);
    assert_eq!(code_to_voltage(14, DEFAULT_VREF, 8192), 0.0);
    assert_eq!(code_to_voltage(14, 0.0, 8192), 0.0);
}
