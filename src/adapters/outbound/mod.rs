mod maxmind_geo_reader;

pub use maxmind_geo_reader::GeoReader;
