use crate::code::Resolution;
use crate::table::WaveTable;

#[test]
fn sixteen_sample_table() {
    let table = WaveTable::<16>::sine(Resolution::FULL);

    assert_eq!(table.len(), 16);
    assert_eq!(table[0], 8192);
    assert_eq!(table[4], 16383);
    assert_eq!(table[8], 8192);
    assert_eq!(table[12], 0);
    assert!(table.iter().all(|&code| code <= 16383));
}

#[test]
fn second_half_mirrors_first() {
    let table = WaveTable::<64>::sine(Resolution::FULL);
    for i in 1..32 {
        let up = table[i] as i32 - 8192;
        let down = 8192 - table[64 - i] as i32;
        assert!((up - down).abs() <= 1, "asymmetry at {i}: {up} vs {down}");
    }
}

#[test]
fn index_wraps() {
    let table = WaveTable::<16>::sine(Resolution::FULL);
    assert_eq!(table.at(16), table[0]);
    assert_eq!(table.at(37), table[5]);
}

#[test]
fn narrow_resolution_fits() {
    let table = WaveTable::<32>::sine(Resolution::new(8));
    assert_eq!(table.resolution().bits(), 8);
    assert_eq!(table[0], 128);
    assert_eq!(table[8], 255);
    assert!(table.as_slice().iter().all(|&code| code <= 255));
}
