//! Bounded single-producer/single-consumer event queue between the input
//! context and the audio context.
//!
//! Packets cross as plain `u32` words. Neither end ever blocks: a full queue
//! drops the packet and reports it, an empty queue simply yields nothing.

use log::warn;
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{error::Error, io::midi::UsbMidiPacket};

/// Create a queue holding at most `capacity` packets.
pub fn event_queue(capacity: usize) -> (EventSender, EventReceiver) {
    let (tx, rx) = RingBuffer::<u32>::new(capacity);
    (EventSender { tx }, EventReceiver { rx })
}

/// Producer half, owned by the input context.
pub struct EventSender {
    tx: Producer<u32>,
}

impl EventSender {
    /// Enqueue a packet. On a full queue the packet is lost for good.
    pub fn send(&mut self, packet: UsbMidiPacket) -> Result<(), Error> {
        self.tx.push(packet.raw()).map_err(|_| {
            warn!("event queue full, dropping {packet:?}");
            Error::QueueFull { packet }
        })
    }

    /// Free slots left.
    pub fn slots(&self) -> usize {
        self.tx.slots()
    }

    pub fn is_full(&self) -> bool {
        self.tx.is_full()
    }
}

/// Consumer half, owned by the audio context.
pub struct EventReceiver {
    rx: Consumer<u32>,
}

impl EventReceiver {
    pub fn recv(&mut self) -> Option<UsbMidiPacket> {
        self.rx.pop().ok().map(UsbMidiPacket::from_raw)
    }

    /// Packets waiting to be read.
    pub fn pending(&self) -> usize {
        self.rx.slots()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Iterator for EventReceiver {
    type Item = UsbMidiPacket;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::midi::MidiEvent;

    #[test]
    fn preserves_order() {
        let (mut tx, mut rx) = event_queue(8);
        for key in 60..64 {
            tx.send(MidiEvent::note_on(key).to_packet(0)).unwrap();
        }

        let keys: Vec<_> = std::iter::from_fn(|| rx.recv())
            .map(|p| match p.decode() {
                Ok(MidiEvent::NoteOn { key, .. }) => key,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(keys, vec![60, 61, 62, 63]);
    }

    #[test]
    fn empty_queue_yields_nothing() {
        let (_tx, mut rx) = event_queue(4);
        assert!(rx.is_empty());
        assert_eq!(rx.recv(), None);
    }

    #[test]
    fn full_queue_drops_and_reports() {
        let (mut tx, mut rx) = event_queue(2);
        let a = MidiEvent::note_on(60).to_packet(0);
        let b = MidiEvent::note_on(62).to_packet(0);
        let c = MidiEvent::note_on(64).to_packet(0);

        tx.send(a).unwrap();
        tx.send(b).unwrap();
        assert!(tx.is_full());
        assert_eq!(tx.send(c), Err(Error::QueueFull { packet: c }));

        assert_eq!(rx.recv(), Some(a));
        assert_eq!(rx.recv(), Some(b));
        assert_eq!(rx.recv(), None);
    }

    #[test]
    fn works_across_threads() {
        let (mut tx, rx) = event_queue(1024);
        let producer = std::thread::spawn(move || {
            for key in 0..100u8 {
                tx.send(MidiEvent::note_on(key).to_packet(0)).unwrap();
            }
        });
        producer.join().unwrap();

        assert_eq!(rx.count(), 100);
    }
}
