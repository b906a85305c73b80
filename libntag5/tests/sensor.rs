// Aggregator for sensor driver tests in `tests/sensor/`. These run against
// the simulated I2C bus from `libntag5::test_support`.

#[path = "sensor/tmp117_test.rs"]
mod tmp117_test;

#[path = "sensor/si1143_test.rs"]
mod si1143_test;

#[path = "sensor/tmp112_test.rs"]
mod tmp112_test;
