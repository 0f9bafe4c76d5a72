//! Many producer threads delivering concurrently: records stay atomic
//! (never interleaved mid-record), per-producer order is FIFO, and the
//! callback path invokes exactly once per record.

use std::sync::Arc;
use std::thread;

use eventlog::{EventLogConfig, EventLogContext};

const PRODUCERS: usize = 8;
const RECORDS_PER_PRODUCER: usize = 500;
const RECORD_LEN: usize = 4;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fixed-size record: [producer, seq_hi, seq_lo, checksum].
fn record(producer: u8, seq: u16) -> [u8; RECORD_LEN] {
    let [hi, lo] = seq.to_be_bytes();
    [producer, hi, lo, producer ^ hi ^ lo]
}

#[test]
fn pull_queue_preserves_record_atomicity_and_producer_order() {
    init_logging();
    let ctx = Arc::new(
        EventLogContext::new(EventLogConfig {
            chunk_size: 64,
            // Plenty of room: this test is about ordering, not drops.
            max_chunks: 4096,
            header: Vec::new(),
        })
        .expect("valid config"),
    );
    ctx.set_pull_sink(false, false);

    let mut stream = Vec::new();
    thread::scope(|scope| {
        for producer in 0..PRODUCERS {
            let ctx = Arc::clone(&ctx);
            scope.spawn(move || {
                for seq in 0..RECORDS_PER_PRODUCER {
                    let rec = record(
                        u8::try_from(producer).expect("small"),
                        u16::try_from(seq).expect("small"),
                    );
                    ctx.deliver(&rec);
                }
            });
        }

        // Poll concurrently, like a real pull consumer. Absence of data is
        // a normal result; just try again.
        let drainer = Arc::clone(&ctx);
        scope.spawn(move || {
            let mut drained = Vec::new();
            loop {
                match drainer.pop_chunk() {
                    Some(chunk) => drained.extend_from_slice(chunk.as_bytes()),
                    None => {
                        if drained.len() / RECORD_LEN >= PRODUCERS * RECORDS_PER_PRODUCER / 2 {
                            break; // drained at least half; producers may still run
                        }
                        thread::yield_now();
                    }
                }
            }
            drained
        });
    });

    // Producers are done: expose the tail and drain everything left.
    ctx.resize_buffers(1);
    while let Some(chunk) = ctx.pop_chunk() {
        stream.extend_from_slice(chunk.as_bytes());
    }

    // The concurrent drainer kept a prefix of the stream for itself, so
    // only check structure on what remains: whole records, each intact.
    assert_eq!(stream.len() % RECORD_LEN, 0, "records never split");

    let mut last_seq = vec![None::<u16>; PRODUCERS];
    for rec in stream.chunks_exact(RECORD_LEN) {
        let producer = usize::from(rec[0]);
        let seq = u16::from_be_bytes([rec[1], rec[2]]);
        assert_eq!(rec[3], rec[0] ^ rec[1] ^ rec[2], "record bytes intact");
        assert!(producer < PRODUCERS);
        if let Some(prev) = last_seq[producer] {
            assert!(seq > prev, "per-producer FIFO violated: {seq} after {prev}");
        }
        last_seq[producer] = Some(seq);
    }
}

#[test]
fn full_stream_drains_completely_after_quiescence() {
    init_logging();
    let ctx = Arc::new(
        EventLogContext::new(EventLogConfig {
            chunk_size: 64,
            max_chunks: 4096,
            header: Vec::new(),
        })
        .expect("valid config"),
    );
    ctx.set_pull_sink(false, false);

    thread::scope(|scope| {
        for producer in 0..PRODUCERS {
            let ctx = Arc::clone(&ctx);
            scope.spawn(move || {
                for seq in 0..RECORDS_PER_PRODUCER {
                    let rec = record(
                        u8::try_from(producer).expect("small"),
                        u16::try_from(seq).expect("small"),
                    );
                    ctx.deliver(&rec);
                }
            });
        }
    });

    ctx.resize_buffers(1);
    let mut stream = Vec::new();
    while let Some(chunk) = ctx.pop_chunk() {
        stream.extend_from_slice(chunk.as_bytes());
    }

    assert_eq!(stream.len(), PRODUCERS * RECORDS_PER_PRODUCER * RECORD_LEN);
    assert_eq!(ctx.drop_stats().bytes, 0);

    // Every producer's full sequence is present, in order.
    let mut next_seq = vec![0u16; PRODUCERS];
    for rec in stream.chunks_exact(RECORD_LEN) {
        let producer = usize::from(rec[0]);
        let seq = u16::from_be_bytes([rec[1], rec[2]]);
        assert_eq!(seq, next_seq[producer]);
        next_seq[producer] += 1;
    }
    let expected = u16::try_from(RECORDS_PER_PRODUCER).expect("small");
    assert!(next_seq.iter().all(|&n| n == expected));
}

#[test]
fn callback_sink_sees_every_record_exactly_once() {
    init_logging();
    let ctx = Arc::new(
        EventLogContext::new(EventLogConfig::default()).expect("valid config"),
    );

    let (tx, rx) = crossbeam_channel::unbounded::<Vec<u8>>();
    ctx.set_callback_sink(
        Some(Arc::new(move |bytes: &[u8]| {
            tx.send(bytes.to_vec()).expect("collector alive");
        })),
        false,
        false,
    );

    thread::scope(|scope| {
        for producer in 0..PRODUCERS {
            let ctx = Arc::clone(&ctx);
            scope.spawn(move || {
                for seq in 0..RECORDS_PER_PRODUCER {
                    let rec = record(
                        u8::try_from(producer).expect("small"),
                        u16::try_from(seq).expect("small"),
                    );
                    ctx.deliver(&rec);
                }
            });
        }
    });

    // Detach so the collector channel closes.
    ctx.set_callback_sink(None, false, false);

    let mut counts = vec![0usize; PRODUCERS];
    for rec in rx.iter() {
        assert_eq!(rec.len(), RECORD_LEN);
        counts[usize::from(rec[0])] += 1;
    }
    assert!(counts.iter().all(|&n| n == RECORDS_PER_PRODUCER));
}
