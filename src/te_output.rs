//! Write annotated TE events to the TE cluster table
//!

use std::io::Write;

use camino::Utf8Path;
use log::info;
use simple_error::{SimpleResult, try_with};

use crate::cluster_te::{ChromTeEvents, EndCluster, TeEvent};
use crate::gz_utils::{create_gz_writer, finish_gz_writer};
use crate::reference_te::TeSideAnnotation;

pub const TE_CLUSTER_HEADER: &str =
    "chromo\tnplus\tnminus\tpfirst\tplast\tpdist\tpin\tmfirst\tmlast\tmdist\tmin";

const UNKNOWN: &str = "-1";

/// Write first, last, distance and within columns for one side of an event
///
fn write_side(
    writer: &mut impl Write,
    cluster: Option<&EndCluster>,
    annotation: &TeSideAnnotation,
) -> std::io::Result<()> {
    let Some(cluster) = cluster else {
        return write!(writer, "{UNKNOWN}\t{UNKNOWN}\t{UNKNOWN}\t{UNKNOWN}");
    };
    write!(writer, "{}\t{}\t", cluster.range.start, cluster.range.end)?;
    match annotation.te_distance {
        Some(x) => write!(writer, "{x}\t")?,
        None => write!(writer, "{UNKNOWN}\t")?,
    }
    match annotation.is_within_te {
        Some(x) => write!(writer, "{}", x as u8),
        None => write!(writer, "{UNKNOWN}"),
    }
}

fn write_event(writer: &mut impl Write, chrom: &str, event: &TeEvent) -> std::io::Result<()> {
    let candidate = &event.candidate;
    let get_read_count = |x: Option<EndCluster>| x.map(|c| c.read_count).unwrap_or(0);
    write!(
        writer,
        "{}\t{}\t{}\t",
        chrom,
        get_read_count(candidate.plus),
        get_read_count(candidate.minus)
    )?;
    write_side(writer, candidate.plus.as_ref(), &event.plus_annotation)?;
    write!(writer, "\t")?;
    write_side(writer, candidate.minus.as_ref(), &event.minus_annotation)?;
    writeln!(writer)
}

/// Write all TE events as one table row each, returning the number of rows written
///
pub fn write_te_events(
    writer: &mut impl Write,
    chrom_events: &[ChromTeEvents],
) -> std::io::Result<usize> {
    writeln!(writer, "{TE_CLUSTER_HEADER}")?;
    let mut count = 0;
    for ce in chrom_events.iter() {
        for event in ce.events.iter() {
            write_event(writer, &ce.chrom, event)?;
            count += 1;
        }
    }
    Ok(count)
}

pub fn write_te_event_file(
    filename: &Utf8Path,
    chrom_events: &[ChromTeEvents],
) -> SimpleResult<()> {
    info!("Writing TE events to file: '{filename}'");

    let label = "TE cluster";
    let mut writer = create_gz_writer(filename, label)?;
    try_with!(
        write_te_events(&mut writer, chrom_events),
        "Unable to write {} file: '{}'",
        label,
        filename
    );
    finish_gz_writer(writer, label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster_te::TeEventCandidate;
    use crate::int_range::IntRange;

    fn get_cluster(start: i64, end: i64, read_count: usize) -> EndCluster {
        EndCluster {
            range: IntRange::from_pair(start, end),
            read_count,
        }
    }

    #[test]
    fn test_write_te_events() {
        let chrom_events = vec![ChromTeEvents {
            chrom: "chr1".to_string(),
            events: vec![
                TeEvent {
                    candidate: TeEventCandidate {
                        plus: Some(get_cluster(1000, 1200, 2)),
                        minus: Some(get_cluster(2000, 2150, 3)),
                    },
                    plus_annotation: TeSideAnnotation {
                        te_distance: Some(500),
                        is_within_te: Some(false),
                    },
                    minus_annotation: TeSideAnnotation {
                        te_distance: None,
                        is_within_te: Some(true),
                    },
                },
                TeEvent {
                    candidate: TeEventCandidate {
                        plus: None,
                        minus: Some(get_cluster(7000, 7000, 1)),
                    },
                    plus_annotation: TeSideAnnotation::default(),
                    minus_annotation: TeSideAnnotation::default(),
                },
            ],
        }];

        let mut output = Vec::new();
        let count = write_te_events(&mut output, &chrom_events).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(output).unwrap();
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], TE_CLUSTER_HEADER);
        assert_eq!(lines[1], "chr1\t2\t3\t1000\t1200\t500\t0\t2000\t2150\t-1\t1");
        assert_eq!(lines[2], "chr1\t0\t1\t-1\t-1\t-1\t-1\t7000\t7000\t-1\t-1");
    }
}
