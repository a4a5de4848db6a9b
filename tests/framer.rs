use openlst::blocks::Framer;
use openlst::runtime::mocker::Mocker;
use openlst::runtime::mocker::Reader;
use openlst::runtime::mocker::Writer;
use openlst::runtime::Tag;
use openlst::Decoder;
use openlst::FramerConfig;

#[test]
fn framer_output_decodes() {
    let config = FramerConfig::builder().sequence_seed(100).build().unwrap();
    let input: Vec<u8> = (0..600).map(|i| (i % 251) as u8).collect();

    let mut block = Framer::<Reader<u8>, Writer<u8>>::new(config);
    block.input().set(input.clone());
    block.output().reserve(4096);

    let mut mocker = Mocker::new(block);
    mocker.run().unwrap();
    assert!(mocker.finished());

    let (out, tags) = mocker.output().get();
    assert_eq!(tags.len(), 3);
    for t in tags.iter() {
        assert!(matches!(&t.tag, Tag::NamedUsize(name, _) if name == "burst_start"));
    }

    let (frames, err) = Decoder::new(config).decode_all(&out);
    assert!(err.is_none());
    let lens: Vec<usize> = frames.iter().map(|f| f.payload().len()).collect();
    assert_eq!(lens, vec![255, 255, 90]);
    let seqs: Vec<u16> = frames.iter().map(|f| f.header().sequence).collect();
    assert_eq!(seqs, vec![100, 101, 102]);

    let payload: Vec<u8> = frames.into_iter().flat_map(|f| f.into_payload()).collect();
    assert_eq!(payload, input);
}

#[test]
fn framer_streams_in_small_steps() {
    let config = FramerConfig::default();
    let mut block = Framer::<Reader<u8>, Writer<u8>>::with_chunk_size(config, 16).unwrap();
    block.input().push(b"stream".to_vec());

    let mut mocker = Mocker::new(block);
    let mut collected = Vec::new();

    for step in 0..50 {
        if step == 3 {
            mocker.input().push(b" of bytes".to_vec());
            mocker.input().finish();
        }
        mocker.output().reserve(5);
        mocker.run().unwrap();
        collected.extend(mocker.output().take().0);
        if mocker.finished() {
            break;
        }
    }
    assert!(mocker.finished());

    let (frames, err) = Decoder::new(config).decode_all(&collected);
    assert!(err.is_none());
    let payload: Vec<u8> = frames.into_iter().flat_map(|f| f.into_payload()).collect();
    assert_eq!(payload, b"stream of bytes".to_vec());
}
