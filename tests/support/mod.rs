#![allow(dead_code, reason = "each test binary uses a different part")]

use std::path::{Path, PathBuf};

use arcdex::config::ArchiveDef;

pub const NAV: &str = r##"<html><head><title>Lift Til Ya Die</title>
<link rel="stylesheet" href="site.css"></head>
<body><img src="img/logo.gif">
<a href="img/logo.gif">full size logo</a>
<a href="96Marin.htm">1996 Marin Open</a>
<a href="Results/13University.htm#TRIALS">2013 University Nationals</a>
<a href="#top">top</a> <a href="http://example.com/">elsewhere</a>
</body></html>"##;

pub const MARIN: &str = "<html><head><title>1996 Marin Open</title></head><body>\
<table><caption>1996 Marin Open<br>San Rafael, CA<br>March 16, 1996</caption>\
<tr><td>1</td><td>Jim</td></tr></table></body></html>";

pub const UNIVERSITY: &str = "<html><body><h1>University Nationals</h1>\
<p>Held April 5-6, 2013 in Sacramento, CA</p><p>AMERICAN RECORD 150</p>\
<p>reported by Jim Schmitz</p></body></html>";

pub const TEMP: &str = "<html><body><p>draft of November 1998</p></body></html>";

/// fresh empty directory under the cargo scratch dir
pub fn scratch(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_TARGET_TMPDIR"));
    path.push(name);
    if path.exists() {
        std::fs::remove_dir_all(&path).unwrap();
    }
    std::fs::create_dir_all(&path).unwrap();
    path
}

pub fn touch(root: &Path, rel: &str, contents: &[u8]) {
    let p = root.join(rel);
    std::fs::create_dir_all(p.parent().unwrap()).unwrap();
    std::fs::write(p, contents).unwrap();
}

/// a small mirrored site in `<scratch>/site`, indexes going to `<scratch>/out`
pub fn sample_archive(name: &str) -> ArchiveDef {
    let base = scratch(name);
    let site = base.join("site");
    touch(&site, "w8lift.htm", NAV.as_bytes());
    touch(&site, "index.htm", b"<html><body>welcome</body></html>");
    touch(&site, "97NatsEntry.htm", b"<html><body>entry form</body></html>");
    touch(&site, "96Marin.htm", MARIN.as_bytes());
    touch(&site, "Temp98.htm", TEMP.as_bytes());
    touch(&site, "w8lift.htm%5D", b"<html>mangled copy</html>");
    touch(&site, "site.css", b"body { color: black }");
    touch(&site, "empty.txt", b"");
    touch(&site, "img/logo.gif", b"GIF89a logo");
    touch(&site, "img/logo_copy.gif", b"GIF89a logo");
    touch(&site, "Results/13University.htm", UNIVERSITY.as_bytes());
    touch(&site, "Results/96Marin.htm", MARIN.as_bytes());
    touch(&site, "Results/1989Nats.xls", b"\xd0\xcf\x11\xe0 sheet");
    touch(&site, "Results/readme.txt", b"not a result");

    ArchiveDef {
        archive_root: site,
        output_dir: base.join("out"),
        ..ArchiveDef::default()
    }
}
