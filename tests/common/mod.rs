#![allow(dead_code)]

use umbra::{
    solar_eclipses::EclipseType::{self, Annular, Partial, Total},
    time::TimeStamp,
    umbra::Umbra,
};

/// Greatest eclipse (TD) and type of the solar eclipses of 2001-2019, from the NASA
/// Five Millennium Canon of Solar Eclipses. Hybrid eclipses are listed as total.
pub const NASA_ECLIPSES_2001_2019: [(&str, EclipseType); 42] = [
    ("2001-06-21T12:04:46 TDB", Total),
    ("2001-12-14T20:53:01 TDB", Annular),
    ("2002-06-10T23:45:22 TDB", Annular),
    ("2002-12-04T07:32:16 TDB", Total),
    ("2003-05-31T04:09:22 TDB", Annular),
    ("2003-11-23T22:50:22 TDB", Total),
    ("2004-04-19T13:35:05 TDB", Partial),
    ("2004-10-14T03:00:23 TDB", Partial),
    ("2005-04-08T20:36:51 TDB", Annular),
    ("2005-10-03T10:32:47 TDB", Annular),
    ("2006-03-29T10:12:23 TDB", Total),
    ("2006-09-22T11:41:16 TDB", Annular),
    ("2007-03-19T02:32:57 TDB", Partial),
    ("2007-09-11T12:32:24 TDB", Partial),
    ("2008-02-07T03:56:10 TDB", Annular),
    ("2008-08-01T10:22:12 TDB", Total),
    ("2009-01-26T07:59:45 TDB", Annular),
    ("2009-07-22T02:36:25 TDB", Total),
    ("2010-01-15T07:07:39 TDB", Annular),
    ("2010-07-11T19:34:38 TDB", Total),
    ("2011-01-04T08:51:42 TDB", Partial),
    ("2011-06-01T21:17:18 TDB", Partial),
    ("2011-07-01T08:39:30 TDB", Partial),
    ("2011-11-25T06:21:34 TDB", Partial),
    ("2012-05-20T23:53:54 TDB", Annular),
    ("2012-11-13T22:12:55 TDB", Total),
    ("2013-05-10T00:26:20 TDB", Annular),
    ("2013-11-03T12:47:36 TDB", Annular),
    ("2014-04-29T06:04:33 TDB", Annular),
    ("2014-10-23T21:45:39 TDB", Partial),
    ("2015-03-20T09:46:47 TDB", Total),
    ("2015-09-13T06:55:19 TDB", Partial),
    ("2016-03-09T01:58:19 TDB", Total),
    ("2016-09-01T09:08:02 TDB", Annular),
    ("2017-02-26T14:54:33 TDB", Annular),
    ("2017-08-21T18:26:40 TDB", Total),
    ("2018-02-15T20:52:33 TDB", Partial),
    ("2018-07-13T03:02:16 TDB", Partial),
    ("2018-08-11T09:47:28 TDB", Partial),
    ("2019-01-06T01:42:38 TDB", Partial),
    ("2019-07-02T19:24:08 TDB", Total),
    ("2019-12-26T05:18:53 TDB", Annular),
];

/// Tolerance on the instant of greatest eclipse, in seconds.
pub const MAX_TIME_TOLERANCE_SECONDS: f64 = 120.0;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parse the reference instants of [`NASA_ECLIPSES_2001_2019`].
pub fn nasa_eclipses(ctx: &Umbra) -> Vec<(TimeStamp, EclipseType)> {
    NASA_ECLIPSES_2001_2019
        .iter()
        .map(|(date, kind)| {
            let time = ctx
                .get_time_correlation()
                .instant_from_str(date)
                .unwrap_or_else(|e| panic!("bad fixture date {date}: {e}"));
            (time, *kind)
        })
        .collect()
}

/// Seconds between two instants, on the TDB scale.
pub fn seconds_apart(a: &TimeStamp, b: &TimeStamp) -> f64 {
    (a.jd_tdb - b.jd_tdb).abs() * 86400.0
}
