//! Wire-level behaviour through the public API

use cmdlink_protocol::{Arguments, CommandParser, Outcome, State, Status};
use heapless::Deque;
use proptest::prelude::*;

type Parser = CommandParser<32, 8>;

fn led(args: &mut Arguments<'_, 32>) -> Outcome {
    let _ = args.parse_bool();
    args.is_valid().into()
}

fn add(args: &mut Arguments<'_, 32>) -> Outcome {
    let a = args.parse_int();
    let b = args.parse_int();
    if !args.is_valid() {
        return Outcome::Format;
    }
    match a.checked_add(b) {
        Some(_) => Outcome::Finished,
        None => Outcome::Error,
    }
}

fn parser() -> Parser {
    let mut parser = Parser::new();
    parser.register("led", led).unwrap();
    parser.register("add", add).unwrap();
    parser
}

/// Feed `input` through a ring buffer and collect the status lines produced
fn responses(parser: &mut Parser, input: &[u8]) -> Vec<String> {
    let mut rx = Deque::<u8, 256>::new();
    for &byte in input {
        rx.push_back(byte).unwrap();
    }

    let mut lines = Vec::new();
    // Decode and execute steps do not consume input
    for _ in 0..input.len() * 3 + 8 {
        parser.process(&mut rx);
        if let Some(line) = parser.info() {
            lines.push(line.as_str().to_owned());
        }
    }
    lines
}

#[test]
fn test_led_on() {
    let mut parser = parser();
    assert_eq!(responses(&mut parser, b"$led 1\r"), [":ACK"]);
}

#[test]
fn test_unknown_command() {
    let mut parser = parser();
    assert_eq!(responses(&mut parser, b"$foo\r"), [":ERR:CMD"]);
}

#[test]
fn test_stream_of_frames() {
    let mut parser = parser();
    let input = b"noise$led HIGH\r$add 1,2\r$add 0x7FFFFFFF,1\r$add 1\r$\r$led\r";
    assert_eq!(
        responses(&mut parser, input),
        [
            ":ACK",
            ":ACK",
            ":ERR",
            ":ERR:FMT:5",
            ":ERR:FMT:0",
            ":ERR:FMT:3",
        ]
    );
}

#[test]
fn test_overflow_then_resync() {
    let mut parser = parser();
    let mut input = Vec::from(&b"$"[..]);
    input.extend(std::iter::repeat(b'a').take(40));
    input.extend_from_slice(b"\r$led off\r");

    assert_eq!(responses(&mut parser, &input), [":ERR:OVF", ":ACK"]);
}

#[test]
fn test_long_boolean_reports_offset_past_sixth_byte() {
    let mut parser = parser();
    assert_eq!(
        responses(&mut parser, b"$led abcdefgh\r$led abcde\r"),
        [":ERR:FMT:10", ":ERR:FMT:9"]
    );
}

#[test]
fn test_two_ints_one_supplied_is_invalid() {
    let mut seen_valid = None;
    let mut check = |args: &mut Arguments<'_, 32>| {
        args.parse_int();
        args.parse_int();
        seen_valid = Some(args.is_valid());
        Outcome::Finished
    };

    {
        let mut parser =
            CommandParser::<32, 1, &mut dyn FnMut(&mut Arguments<'_, 32>) -> Outcome>::new();
        parser.register("pair", &mut check).unwrap();

        let mut rx = b"$pair 4\r".iter().copied();
        let mut source = || rx.next();
        while parser.process(&mut source) != Status::Ack {}
    }

    assert_eq!(seen_valid, Some(false));
}

/// Handler slot for probing one decoder
type Probe<'a> = CommandParser<64, 1, &'a mut dyn FnMut(&mut Arguments<'_, 64>) -> Outcome>;

/// Decode one integer argument and return it if the frame was accepted
fn decode_int(text: &str) -> Option<i32> {
    let mut decoded = None;
    let mut capture = |args: &mut Arguments<'_, 64>| {
        let value = args.parse_int();
        if args.is_valid() {
            decoded = Some(value);
        }
        Outcome::Finished
    };

    {
        let mut parser = Probe::new();
        parser.register("n", &mut capture).unwrap();

        let mut frame = Vec::from(&b"$n "[..]);
        frame.extend_from_slice(text.as_bytes());
        frame.push(b'\r');

        let mut rx = frame.into_iter();
        let mut source = || rx.next();
        for _ in 0..128 {
            if parser.process(&mut source) == Status::Ack {
                break;
            }
        }
    }

    decoded
}

#[test]
fn test_integer_examples() {
    assert_eq!(decode_int("0x1A"), Some(26));
    assert_eq!(decode_int("0b101"), Some(5));
    assert_eq!(decode_int("-0x10"), Some(-16));
    assert_eq!(decode_int("-2147483648"), Some(i32::MIN));
    assert_eq!(decode_int("2147483648"), None);
    assert_eq!(decode_int("12 "), None);
}

proptest! {
    #[test]
    fn prop_decimal_round_trip(value in any::<i32>()) {
        prop_assert_eq!(decode_int(&value.to_string()), Some(value));
    }

    #[test]
    fn prop_hex_round_trip(value in 0..=i32::MAX) {
        prop_assert_eq!(decode_int(&format!("0x{:x}", value)), Some(value));
        prop_assert_eq!(decode_int(&format!("-0X{:X}", value)), Some(-value));
    }

    #[test]
    fn prop_binary_round_trip(value in 0..=i32::MAX) {
        prop_assert_eq!(decode_int(&format!("0b{:b}", value)), Some(value));
    }

    #[test]
    fn prop_boolean_case_insensitive(
        index in 0usize..8,
        mask in any::<u8>(),
    ) {
        const TOKENS: [(&str, bool); 8] = [
            ("0", false), ("1", true), ("off", false), ("on", true),
            ("low", false), ("high", true), ("false", false), ("true", true),
        ];
        let (token, expected) = TOKENS[index];
        let mixed: String = token
            .chars()
            .enumerate()
            .map(|(i, c)| if mask & (1 << i) != 0 { c.to_ascii_uppercase() } else { c })
            .collect();

        let mut decoded = None;
        let mut capture = |args: &mut Arguments<'_, 64>| {
            let value = args.parse_bool();
            decoded = Some((value, args.is_valid()));
            Outcome::Finished
        };
        {
            let mut parser = Probe::new();
            parser.register("b", &mut capture).unwrap();
            let frame = format!("$b {}\r", mixed);
            let mut rx = frame.bytes();
            let mut source = || rx.next();
            while parser.process(&mut source) != Status::Ack {}
        }
        prop_assert_eq!(decoded, Some((expected, true)));
    }

    #[test]
    fn prop_arbitrary_input_never_overflows(input in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut parser = parser();
        let mut rx = input.iter().copied();
        let mut source = || rx.next();

        for _ in 0..input.len() * 3 + 8 {
            let status = parser.process(&mut source);
            prop_assert!(parser.message().len() <= 32);
            prop_assert!(parser.message().offset() <= parser.message().len());
            if status == Status::Ovf {
                prop_assert_eq!(parser.state(), State::Start);
            }
        }

        // Whatever came before, a clean frame is understood afterwards
        parser.reset();
        prop_assert_eq!(responses(&mut parser, b"$led on\r"), [":ACK"]);
    }

    #[test]
    fn prop_long_frames_always_overflow(len in 33usize..200) {
        let mut parser = parser();
        let mut input = Vec::from(&b"$"[..]);
        input.extend(std::iter::repeat(b'x').take(len));
        input.push(b'\r');

        prop_assert_eq!(responses(&mut parser, &input), [":ERR:OVF"]);
    }
}
