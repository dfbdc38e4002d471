//! Output must not depend on where the input is split.

mod common;

use common::{Behavior, Event, Recorder, encode, factory, init_logging};
use proptest::prelude::*;
use zenstream::{
    ChunkQueue, Completion, DecoderConfig, ImageSize, LexerResult, Rgba, SliceSource,
    StreamDecoder,
};

fn run(config: DecoderConfig, data: &[u8], offsets: &[usize]) -> (LexerResult, Recorder) {
    init_logging();
    let (factory, _) = factory(Behavior::default());
    let mut decoder = StreamDecoder::new(config, factory, Recorder::new());
    let result = decoder.decode(&mut SliceSource::split_at(data, offsets));
    (result, decoder.into_target())
}

fn pixels(target: &Recorder) -> Option<(usize, usize, Vec<Rgba<u8>>)> {
    target
        .image()
        .map(|img| (img.width(), img.height(), img.into_buf()))
}

fn sorted(mut offsets: Vec<usize>) -> Vec<usize> {
    offsets.sort_unstable();
    offsets
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn split_points_do_not_change_output(
        width in 1u16..40,
        height in 1u16..40,
        seed in any::<u8>(),
        offsets in prop::collection::vec(0usize..8, 0..8),
    ) {
        let data = encode(width, height, seed);
        let (whole, expected) = run(DecoderConfig::new(), &data, &[]);
        prop_assert!(matches!(whole, LexerResult::Success(Completion::Frame)));

        let (split, actual) = run(DecoderConfig::new(), &data, &sorted(offsets));
        prop_assert!(matches!(split, LexerResult::Success(Completion::Frame)));
        prop_assert_eq!(&actual.events, &expected.events);
        prop_assert_eq!(pixels(&actual), pixels(&expected));
    }

    #[test]
    fn metadata_posts_exactly_once(
        width in 1u16..2000,
        height in 1u16..2000,
        chunk_len in 1usize..8,
    ) {
        init_logging();
        let data = encode(width, height, 0);
        let (factory, calls) = factory(Behavior::default());
        let mut decoder = StreamDecoder::new(DecoderConfig::metadata(), factory, Recorder::new());
        let result = decoder.decode(&mut SliceSource::fixed(&data, chunk_len));
        prop_assert!(matches!(result, LexerResult::Success(Completion::Metadata)));

        let size = ImageSize::new(width.into(), height.into());
        prop_assert_eq!(&decoder.target().events, &vec![Event::Size(size)]);
        prop_assert_eq!(calls.borrow().decode_frames, 0);
        prop_assert_eq!(calls.borrow().dropped, 1);
    }

    #[test]
    fn queued_delivery_matches_whole(
        width in 1u16..24,
        height in 1u16..24,
        sizes in prop::collection::vec(1usize..4, 1..8),
    ) {
        let data = encode(width, height, 0x5A);
        let (_, expected) = run(DecoderConfig::new(), &data, &[]);

        init_logging();
        let (factory, _) = factory(Behavior::default());
        let mut decoder = StreamDecoder::new(DecoderConfig::new(), factory, Recorder::new());
        let mut queue = ChunkQueue::new();
        let mut rest = data.as_slice();
        let mut result = LexerResult::NeedMoreData;
        for len in sizes.iter().cycle() {
            if rest.is_empty() {
                break;
            }
            let (chunk, tail) = rest.split_at((*len).min(rest.len()));
            rest = tail;
            queue.push(chunk);
            result = decoder.decode(&mut queue);
            if result.is_terminal() {
                break;
            }
        }
        prop_assert!(matches!(result, LexerResult::Success(Completion::Frame)));
        prop_assert_eq!(pixels(decoder.target()), pixels(&expected));
    }
}
