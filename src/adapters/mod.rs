//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to               |
//! |------------|---------------------|---------------------------|
//! | `hardware` | SensorPort          | MAX31865 over SPI         |
//! |            | ActuatorPort        | Five relay GPIOs          |
//! | `console`  | ConsolePort         | UART operator console     |
//! | `log_sink` | EventSink           | `log` facade              |
//! | `time`     | —                   | Monotonic ms clock        |

pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod time;
