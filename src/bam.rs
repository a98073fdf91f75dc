//! Reading alignments from BAM files.

use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;

use noodles::bam;
use noodles::sam;
use noodles::sam::alignment::Record as _;
use omics::coordinate::position::Number;
use omics::coordinate::Contig;
use omics::coordinate::Strand;
use tracing::trace;

use crate::Alignment;
use crate::Sample;

/// Opens a BAM file as a [`Sample`].
///
/// The header is read eagerly, so a missing or malformed file fails here
/// rather than once counting has started. The reference sequences in the
/// header become the contigs declared by the sample.
pub fn open<P>(src: P, label: impl Into<String>) -> io::Result<Sample<Alignments<impl Read>>>
where
    P: AsRef<Path>,
{
    let src = src.as_ref();
    let with_path = |err: io::Error| io::Error::new(err.kind(), format!("{}: {err}", src.display()));

    let mut reader = File::open(src)
        .map(bam::io::Reader::new)
        .map_err(with_path)?;
    let header = reader.read_header().map_err(with_path)?;

    let contigs = contigs(&header);
    let alignments = Alignments {
        reader,
        contigs: contigs.clone(),
        record: bam::Record::default(),
    };

    Ok(Sample::new(label, alignments).with_contigs(contigs))
}

/// Gets the names of the reference sequences in a header.
fn contigs(header: &sam::Header) -> Vec<Contig> {
    header
        .reference_sequences()
        .keys()
        .map(|name| Contig::from(name.to_string()))
        .collect()
}

/// An iterator over the mapped alignments within a BAM file.
///
/// Unmapped records are skipped.
#[allow(missing_debug_implementations)]
pub struct Alignments<R> {
    /// The inner reader.
    reader: bam::io::Reader<R>,

    /// The reference sequence names, indexed by reference sequence id.
    contigs: Vec<Contig>,

    /// A reusable record buffer.
    record: bam::Record,
}

impl<R> Iterator for Alignments<R>
where
    R: Read,
{
    type Item = io::Result<Alignment>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(0) => return None,
                Ok(_) => match convert(&self.contigs, &self.record) {
                    Ok(Some(alignment)) => return Some(Ok(alignment)),
                    Ok(None) => trace!("skipping unmapped record"),
                    Err(err) => return Some(Err(err)),
                },
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

/// Converts a BAM record into an [`Alignment`].
///
/// Returns [`None`] if the record is not mapped to a position on a reference
/// sequence.
fn convert(contigs: &[Contig], record: &bam::Record) -> io::Result<Option<Alignment>> {
    let flags = record.flags();

    if flags.is_unmapped() {
        return Ok(None);
    }

    let id = match record.reference_sequence_id().transpose()? {
        Some(id) => id,
        None => return Ok(None),
    };

    let contig = contigs.get(id).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("reference sequence id {id} is not declared in the header"),
        )
    })?;

    let start = match record.alignment_start().transpose()? {
        Some(position) => position.get() as Number,
        None => return Ok(None),
    };

    // A record without any reference-consuming operations still occupies its
    // start position.
    let span = record.alignment_span().transpose()?.unwrap_or(1).max(1) as Number;

    let strand = match flags.is_reverse_complemented() {
        true => Strand::Negative,
        false => Strand::Positive,
    };

    Ok(Some(Alignment::from_span(
        contig.clone(),
        start,
        start + span - 1,
        strand,
        flags.is_duplicate(),
    )))
}
